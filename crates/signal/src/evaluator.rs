use chrono::Utc;
use tracing::debug;

use common::{CrossEvent, FeatureSet, SignalDecision};

use crate::config::Thresholds;
use crate::features::Snapshot;
use crate::scoring;

/// Gate criteria, in evaluation order. These names are wire-stable: they
/// appear in `SignalDecision::failed_criteria`, logs, and alerts.
pub const PRICE_ABOVE_EMA200: &str = "price_above_ema200";
pub const ADX_15M: &str = "adx_15m";
pub const ADX_1H: &str = "adx_1h";
pub const RSI_15M: &str = "rsi_15m";
pub const RSI_1H: &str = "rsi_1h";
pub const EMA_EXPANSION: &str = "ema_expansion";
pub const EMA200_SLOPE: &str = "ema200_slope";
pub const VOLUME_AT_CROSS: &str = "volume_at_cross";

/// Apply the compulsory-criteria gate to one feature set. Stateless; one
/// crossover yields exactly one of two terminal outcomes, with every failing
/// criterion recorded (not just the first).
///
/// Comparison operators are deliberately uneven: criteria 1-7 are strict
/// (`>`), volume alone is inclusive (`>=`). An unavailable feature fails its
/// criterion rather than erroring, so the decision always resolves.
pub fn evaluate(
    cross: CrossEvent,
    features: FeatureSet,
    snap: Snapshot,
    cfg: &Thresholds,
) -> SignalDecision {
    let mut failed: Vec<&'static str> = Vec::new();

    if !features.price_above_ema200 {
        failed.push(PRICE_ABOVE_EMA200);
    }
    if !above(features.adx_15m, cfg.adx_threshold_15m) {
        failed.push(ADX_15M);
    }
    if !above(features.adx_1h, cfg.adx_threshold_1h) {
        failed.push(ADX_1H);
    }
    if !above(features.rsi_15m, cfg.rsi_threshold_15m) {
        failed.push(RSI_15M);
    }
    if !above(features.rsi_1h, cfg.rsi_threshold_1h) {
        failed.push(RSI_1H);
    }
    if !above(features.expansion_pct, cfg.expansion_threshold) {
        failed.push(EMA_EXPANSION);
    }
    if !above(features.ema200_slope_pct, 0.0) {
        failed.push(EMA200_SLOPE);
    }
    if !at_least(features.volume_ratio, cfg.volume_min_ratio) {
        failed.push(VOLUME_AT_CROSS);
    }

    let passed = failed.is_empty();
    let score = scoring::score(&features, cfg);
    debug!(
        symbol = %cross.symbol,
        passed,
        score,
        failed = ?failed,
        "Crossover judged"
    );

    SignalDecision {
        symbol: cross.symbol.clone(),
        cross,
        features,
        passed,
        failed_criteria: failed,
        score,
        price: snap.price,
        ema200: snap.ema200,
        decided_at: Utc::now(),
    }
}

fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::MAX_SCORE;
    use chrono::{TimeZone, Utc};
    use common::Timeframe;

    fn cross() -> CrossEvent {
        CrossEvent {
            symbol: "BTCUSDT".into(),
            timeframe: Timeframe::M15,
            cross_index: 40,
            cross_timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    /// Scenario A features: every criterion comfortably satisfied.
    fn passing_features() -> FeatureSet {
        FeatureSet {
            price_above_ema200: true,
            adx_15m: Some(27.0),
            adx_1h: Some(24.0),
            rsi_15m: Some(56.0),
            rsi_1h: Some(54.0),
            expansion_pct: Some(0.0025),
            ema200_slope_pct: Some(0.001),
            volume_ratio: Some(5.0),
            structure_holds: true,
            hold_count: 5,
            reclaim_detected: true,
        }
    }

    fn snap() -> Snapshot {
        Snapshot {
            price: Some(45_120.0),
            ema200: Some(45_000.0),
        }
    }

    #[test]
    fn scenario_a_all_criteria_pass() {
        let d = evaluate(cross(), passing_features(), snap(), &Thresholds::default());
        assert!(d.passed);
        assert!(d.failed_criteria.is_empty());
        assert_eq!(d.score, MAX_SCORE);
        assert_eq!(d.price, Some(45_120.0));
        assert_eq!(d.ema200, Some(45_000.0));
    }

    #[test]
    fn scenario_b_low_volume_rejects_with_named_criterion() {
        let features = FeatureSet {
            volume_ratio: Some(1.8),
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        assert!(!d.passed);
        assert_eq!(d.failed_criteria, vec![VOLUME_AT_CROSS]);
        // all other features still populated on the decision
        assert_eq!(d.features.adx_15m, Some(27.0));
        assert_eq!(d.features.rsi_1h, Some(54.0));
    }

    #[test]
    fn every_failing_criterion_is_recorded_in_order() {
        let features = FeatureSet {
            price_above_ema200: false,
            adx_15m: Some(10.0),
            adx_1h: Some(10.0),
            rsi_15m: Some(40.0),
            rsi_1h: Some(40.0),
            expansion_pct: Some(0.0001),
            ema200_slope_pct: Some(-0.001),
            volume_ratio: Some(1.0),
            structure_holds: false,
            hold_count: 0,
            reclaim_detected: false,
        };
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        assert_eq!(
            d.failed_criteria,
            vec![
                PRICE_ABOVE_EMA200,
                ADX_15M,
                ADX_1H,
                RSI_15M,
                RSI_1H,
                EMA_EXPANSION,
                EMA200_SLOPE,
                VOLUME_AT_CROSS,
            ]
        );
        assert_eq!(d.score, 0);
    }

    #[test]
    fn strict_comparisons_fail_at_exact_threshold() {
        // Criteria 2-6 use strict `>`: a value equal to its threshold fails.
        let cfg = Thresholds::default();
        let features = FeatureSet {
            adx_15m: Some(cfg.adx_threshold_15m),
            expansion_pct: Some(cfg.expansion_threshold),
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &cfg);
        assert!(!d.passed);
        assert_eq!(d.failed_criteria, vec![ADX_15M, EMA_EXPANSION]);
    }

    #[test]
    fn volume_is_inclusive_at_exact_threshold() {
        let cfg = Thresholds::default();
        let features = FeatureSet {
            volume_ratio: Some(cfg.volume_min_ratio),
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &cfg);
        assert!(d.passed, "volume_ratio == min_ratio must pass (>=)");
    }

    #[test]
    fn flat_slope_fails_criterion_seven() {
        let features = FeatureSet {
            ema200_slope_pct: Some(0.0),
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        assert_eq!(d.failed_criteria, vec![EMA200_SLOPE]);
    }

    #[test]
    fn unavailable_feature_fails_its_criterion() {
        let features = FeatureSet {
            adx_1h: None,
            volume_ratio: None,
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        assert!(!d.passed);
        assert_eq!(d.failed_criteria, vec![ADX_1H, VOLUME_AT_CROSS]);
    }

    #[test]
    fn optional_features_never_gate() {
        let features = FeatureSet {
            structure_holds: false,
            hold_count: 0,
            reclaim_detected: false,
            ..passing_features()
        };
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        assert!(d.passed);
        // but the diagnostic score drops below max
        assert_eq!(d.score, MAX_SCORE - 2);
    }
}
