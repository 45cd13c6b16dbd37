use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use common::{CrossEvent, FeatureSet, Timeframe};
use signal::features::Snapshot;
use signal::{evaluate, Thresholds};

fn cross() -> CrossEvent {
    CrossEvent {
        symbol: "TESTUSDT".into(),
        timeframe: Timeframe::M15,
        cross_index: 40,
        cross_timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn snap() -> Snapshot {
    Snapshot {
        price: Some(45_120.0),
        ema200: Some(45_000.0),
    }
}

fn feature_set(
    adx_15m: f64,
    adx_1h: f64,
    rsi_15m: f64,
    rsi_1h: f64,
    expansion: f64,
    slope: f64,
    volume_ratio: f64,
) -> FeatureSet {
    FeatureSet {
        price_above_ema200: true,
        adx_15m: Some(adx_15m),
        adx_1h: Some(adx_1h),
        rsi_15m: Some(rsi_15m),
        rsi_1h: Some(rsi_1h),
        expansion_pct: Some(expansion),
        ema200_slope_pct: Some(slope),
        volume_ratio: Some(volume_ratio),
        structure_holds: false,
        hold_count: 0,
        reclaim_detected: false,
    }
}

proptest! {
    /// Raising any compulsory threshold can only turn a pass into a reject,
    /// never the reverse; lowering can only turn a reject into a pass.
    #[test]
    fn raising_thresholds_is_monotonic(
        adx_15m in 0.0f64..100.0,
        adx_1h in 0.0f64..100.0,
        rsi_15m in 0.0f64..100.0,
        rsi_1h in 0.0f64..100.0,
        expansion in 0.0f64..0.05,
        slope in -0.01f64..0.01,
        volume_ratio in 0.0f64..20.0,
        bump in 0.0f64..10.0,
        which in 0usize..6,
    ) {
        let features = feature_set(adx_15m, adx_1h, rsi_15m, rsi_1h, expansion, slope, volume_ratio);
        let base = Thresholds::default();

        let mut raised = base.clone();
        match which {
            0 => raised.adx_threshold_15m += bump,
            1 => raised.adx_threshold_1h += bump,
            2 => raised.rsi_threshold_15m += bump,
            3 => raised.rsi_threshold_1h += bump,
            4 => raised.expansion_threshold += bump * 0.001,
            _ => raised.volume_min_ratio += bump,
        }

        let before = evaluate(cross(), features.clone(), snap(), &base);
        let after = evaluate(cross(), features, snap(), &raised);

        // pass under raised thresholds implies pass under base thresholds
        prop_assert!(!after.passed || before.passed);
    }

    /// The failing-criteria list and the verdict always agree, and the
    /// diagnostic score stays within bounds, for arbitrary inputs —
    /// including non-finite features.
    #[test]
    fn decision_is_always_consistent(
        adx_15m in prop::num::f64::ANY,
        volume_ratio in prop::num::f64::ANY,
        slope in -1.0f64..1.0,
    ) {
        let features = feature_set(adx_15m, 24.0, 56.0, 54.0, 0.0025, slope, volume_ratio);
        let d = evaluate(cross(), features, snap(), &Thresholds::default());
        prop_assert_eq!(d.passed, d.failed_criteria.is_empty());
        prop_assert!(d.score <= signal::MAX_SCORE);
    }
}
