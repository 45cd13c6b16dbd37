use common::FeatureSet;

use crate::config::Thresholds;

/// Upper bound of the diagnostic score: one point per criterion, eight
/// compulsory plus the two optional diagnostics.
pub const MAX_SCORE: u32 = 10;

/// Diagnostic score for operator visibility. Uses the same comparison
/// operators as the gate but never influences the pass/reject decision —
/// it is attached to the `SignalDecision` purely as telemetry.
pub fn score(features: &FeatureSet, cfg: &Thresholds) -> u32 {
    breakdown(features, cfg).iter().filter(|(_, hit)| *hit).count() as u32
}

/// Per-criterion hits, in gate order, for structured logging.
pub fn breakdown(features: &FeatureSet, cfg: &Thresholds) -> [(&'static str, bool); 10] {
    let above = |v: Option<f64>, t: f64| v.is_some_and(|v| v > t);
    [
        ("price_above_ema200", features.price_above_ema200),
        ("adx_15m", above(features.adx_15m, cfg.adx_threshold_15m)),
        ("adx_1h", above(features.adx_1h, cfg.adx_threshold_1h)),
        ("rsi_15m", above(features.rsi_15m, cfg.rsi_threshold_15m)),
        ("rsi_1h", above(features.rsi_1h, cfg.rsi_threshold_1h)),
        (
            "ema_expansion",
            above(features.expansion_pct, cfg.expansion_threshold),
        ),
        ("ema200_slope", above(features.ema200_slope_pct, 0.0)),
        (
            "volume_at_cross",
            features
                .volume_ratio
                .is_some_and(|v| v >= cfg.volume_min_ratio),
        ),
        ("structure_hold", features.structure_holds),
        ("reclaim", features.reclaim_detected),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_features() -> FeatureSet {
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

    #[test]
    fn all_ten_satisfied_scores_max() {
        assert_eq!(score(&full_features(), &Thresholds::default()), MAX_SCORE);
    }

    #[test]
    fn nothing_satisfied_scores_zero() {
        let features = FeatureSet {
            price_above_ema200: false,
            adx_15m: None,
            adx_1h: None,
            rsi_15m: None,
            rsi_1h: None,
            expansion_pct: None,
            ema200_slope_pct: None,
            volume_ratio: None,
            structure_holds: false,
            hold_count: 0,
            reclaim_detected: false,
        };
        assert_eq!(score(&features, &Thresholds::default()), 0);
    }

    #[test]
    fn optional_criteria_each_count_one_point() {
        let cfg = Thresholds::default();
        let mut features = full_features();
        features.reclaim_detected = false;
        assert_eq!(score(&features, &cfg), MAX_SCORE - 1);
        features.structure_holds = false;
        assert_eq!(score(&features, &cfg), MAX_SCORE - 2);
    }

    #[test]
    fn breakdown_is_in_gate_order() {
        let hits = breakdown(&full_features(), &Thresholds::default());
        assert_eq!(hits[0].0, "price_above_ema200");
        assert_eq!(hits[7].0, "volume_at_cross");
        assert_eq!(hits[9].0, "reclaim");
        assert_eq!(hits.len() as u32, MAX_SCORE);
    }
}
