use common::{CrossEvent, FeatureSet, IndicatorSeries};

use crate::config::Thresholds;

/// The latest close and slow EMA of the primary series, captured explicitly
/// so decisions and alerts report the exact values the gate saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub price: Option<f64>,
    pub ema200: Option<f64>,
}

pub fn snapshot(primary: &IndicatorSeries) -> Snapshot {
    Snapshot {
        price: primary.latest_close(),
        ema200: IndicatorSeries::latest(&primary.ema_slow),
    }
}

/// Compute all decision inputs for one crossover. Pure function over the
/// frozen snapshot series for this cycle — no mutation, no I/O.
///
/// `primary` is the cross timeframe (15m), `confirm` the higher timeframe
/// (1h); each is read on its own native candle cadence. Any input gap yields
/// a `None` feature, which the evaluator treats as a failed criterion.
pub fn compute_features(
    cross: &CrossEvent,
    primary: &IndicatorSeries,
    confirm: &IndicatorSeries,
    cfg: &Thresholds,
) -> FeatureSet {
    let snap = snapshot(primary);
    let price_above_ema200 = match (snap.price, snap.ema200) {
        (Some(price), Some(ema)) => price > ema,
        _ => false,
    };

    let (structure_holds, hold_count) = structure_hold(primary, cfg);

    FeatureSet {
        price_above_ema200,
        adx_15m: IndicatorSeries::latest(&primary.adx),
        adx_1h: IndicatorSeries::latest(&confirm.adx),
        rsi_15m: IndicatorSeries::latest(&primary.rsi),
        rsi_1h: IndicatorSeries::latest(&confirm.rsi),
        expansion_pct: expansion(primary),
        ema200_slope_pct: slope_since_cross(cross, primary),
        volume_ratio: volume_ratio_at_cross(cross, primary, cfg),
        structure_holds,
        hold_count,
        reclaim_detected: reclaim(primary, cfg),
    }
}

/// Relative separation of the EMA pair at the latest candle:
/// `|fast - slow| / slow`.
fn expansion(series: &IndicatorSeries) -> Option<f64> {
    let fast = IndicatorSeries::latest(&series.ema_fast)?;
    let slow = IndicatorSeries::latest(&series.ema_slow)?;
    if slow == 0.0 {
        return None;
    }
    Some((fast - slow).abs() / slow)
}

/// Relative change of the slow EMA between the cross candle and the latest
/// one. A single two-point comparison — deterministic and replayable, by
/// contrast with a multi-point slope average.
fn slope_since_cross(cross: &CrossEvent, series: &IndicatorSeries) -> Option<f64> {
    let at_cross = series.ema_slow.get(cross.cross_index).copied().flatten()?;
    let now = IndicatorSeries::latest(&series.ema_slow)?;
    if at_cross == 0.0 {
        return None;
    }
    Some((now - at_cross) / at_cross)
}

/// Volume spike evidence anchored at the cross index.
///
/// Numerator: the maximum single-candle volume within
/// `[cross - w, cross + w]`, clipped at the series boundaries — a cross near
/// the start of history gets a smaller window, not an error. Baseline: the
/// mean of the `volume_baseline_period` candles immediately preceding the
/// window start, exclusive, so the spike never contaminates its own baseline
/// and candles appended later can never change it. `None` when the full
/// baseline period is unavailable or its mean is zero.
fn volume_ratio_at_cross(
    cross: &CrossEvent,
    series: &IndicatorSeries,
    cfg: &Thresholds,
) -> Option<f64> {
    let n = series.len();
    if cross.cross_index >= n {
        return None;
    }
    let w = cfg.volume_cross_window;
    let window_start = cross.cross_index.saturating_sub(w);
    let window_end = (cross.cross_index + w + 1).min(n);

    let peak = series.candles[window_start..window_end]
        .iter()
        .map(|c| c.volume)
        .fold(f64::NEG_INFINITY, f64::max);
    if !peak.is_finite() {
        return None;
    }

    if window_start < cfg.volume_baseline_period {
        return None;
    }
    let baseline_start = window_start - cfg.volume_baseline_period;
    let baseline: f64 = series.candles[baseline_start..window_start]
        .iter()
        .map(|c| c.volume)
        .sum::<f64>()
        / cfg.volume_baseline_period as f64;
    if baseline <= 0.0 {
        return None;
    }

    Some(peak / baseline)
}

/// Diagnostic: how many of the last `structure_lookback` closes held above
/// the slow EMA. An unavailable EMA slot counts as not held.
fn structure_hold(series: &IndicatorSeries, cfg: &Thresholds) -> (bool, usize) {
    let n = series.len();
    let lookback = cfg.structure_lookback;
    if n < lookback {
        return (false, 0);
    }
    let hold_count = (n - lookback..n)
        .filter(|&i| matches!(series.ema_slow[i], Some(ema) if series.candles[i].close > ema))
        .count();
    (hold_count >= cfg.structure_min_holds, hold_count)
}

/// Diagnostic: price dipped below the slow EMA within the last
/// `reclaim_lookback - 1` candles but the latest close is back above it.
fn reclaim(series: &IndicatorSeries, cfg: &Thresholds) -> bool {
    let n = series.len();
    let lookback = cfg.reclaim_lookback;
    if n < lookback {
        return false;
    }
    let current_above =
        matches!(series.ema_slow[n - 1], Some(ema) if series.candles[n - 1].close > ema);
    let was_below = (n - lookback..n - 1)
        .any(|i| matches!(series.ema_slow[i], Some(ema) if series.candles[i].close < ema));
    was_below && current_above
}
