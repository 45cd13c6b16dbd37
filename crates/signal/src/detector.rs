use tracing::debug;

use common::{CrossEvent, IndicatorSeries};

/// Outcome of one crossover scan.
///
/// `InsufficientData` is distinct from `NoCross`: it means the series cannot
/// be evaluated at all (too short, or the slow EMA has not warmed up), not
/// that a signal is absent. `Stale` carries a real cross that is too old to
/// evaluate — it is reported, logged, and dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Cross(CrossEvent),
    NoCross,
    Stale(CrossEvent),
    InsufficientData,
}

/// Scan the primary-timeframe series for the most recent bullish crossover
/// within `cross_lookback` candles of the newest one.
///
/// A crossover exists at index `i` when `ema_fast[i-1] <= ema_slow[i-1]` and
/// `ema_fast[i] > ema_slow[i]`. The scan runs newest-backward and stops at
/// the first hit — only one event per scan, older crosses in the same window
/// are not reported. A hit older than `evaluation_window` candles is `Stale`.
pub fn detect_bullish_cross(
    series: &IndicatorSeries,
    cross_lookback: usize,
    evaluation_window: usize,
) -> Detection {
    let n = series.len();
    if n < 2 {
        return Detection::InsufficientData;
    }
    // Slow EMA still warming up at the newest candle: nothing is evaluable.
    if series.ema_slow[n - 1].is_none() {
        return Detection::InsufficientData;
    }

    let newest = n - 1;
    let oldest_check = newest.saturating_sub(cross_lookback.saturating_sub(1)).max(1);

    for i in (oldest_check..=newest).rev() {
        let (Some(fast_prev), Some(slow_prev), Some(fast_curr), Some(slow_curr)) = (
            series.ema_fast[i - 1],
            series.ema_slow[i - 1],
            series.ema_fast[i],
            series.ema_slow[i],
        ) else {
            // Warm-up boundary inside the window; older slots are older still
            break;
        };

        if fast_prev <= slow_prev && fast_curr > slow_curr {
            let event = CrossEvent {
                symbol: series.symbol.clone(),
                timeframe: series.timeframe,
                cross_index: i,
                cross_timestamp: series.candles[i].open_time,
            };
            if newest - i > evaluation_window {
                debug!(
                    symbol = %event.symbol,
                    cross_index = i,
                    age = newest - i,
                    window = evaluation_window,
                    "Bullish cross is stale, dropping"
                );
                return Detection::Stale(event);
            }
            debug!(
                symbol = %event.symbol,
                timeframe = %event.timeframe,
                cross_index = i,
                candles_back = newest - i,
                "Bullish cross detected"
            );
            return Detection::Cross(event);
        }
    }

    Detection::NoCross
}
