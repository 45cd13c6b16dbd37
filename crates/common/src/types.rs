use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One closed candle for a symbol/timeframe.
/// Series are ordered ascending by `open_time`, fixed interval, no gaps —
/// the market-data layer is responsible for that guarantee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Candle cadence. Crosses are detected on `M15`; `H1` confirms trend and
/// momentum on its own native candles (never resampled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    M15,
    H1,
}

impl Timeframe {
    /// Binance interval string for this timeframe.
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::M15 => "15m",
            Timeframe::H1 => "1h",
        }
    }

    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::M15 => 15,
            Timeframe::H1 => 60,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.interval())
    }
}

/// Candles plus indicator values for one symbol/timeframe, index-aligned 1:1
/// with the candle series (index 0 = oldest). Slots before indicator warm-up
/// are `None` — unavailable, never zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSeries {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
    pub ema_fast: Vec<Option<f64>>,
    pub ema_slow: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Latest available (non-warm-up) value of an indicator column.
    pub fn latest(column: &[Option<f64>]) -> Option<f64> {
        column.last().copied().flatten()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// All five columns must share the candle count. The market-data layer
    /// upholds this; debug builds assert it at construction sites.
    pub fn is_aligned(&self) -> bool {
        let n = self.candles.len();
        self.ema_fast.len() == n
            && self.ema_slow.len() == n
            && self.adx.len() == n
            && self.rsi.len() == n
    }
}

/// A detected bullish EMA crossover: the fast EMA moved from at-or-below to
/// above the slow EMA at `cross_index`. Identity key is
/// `(symbol, cross_timestamp)`. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossEvent {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub cross_index: usize,
    pub cross_timestamp: DateTime<Utc>,
}

impl CrossEvent {
    pub fn candles_since(&self, current_index: usize) -> usize {
        current_index.saturating_sub(self.cross_index)
    }
}

/// The decision inputs derived from a crossover plus the snapshot series.
/// `None` means the underlying data was unavailable (warm-up, short history,
/// zero baseline); the dependent criterion then fails rather than erroring.
/// `structure_holds` / `reclaim_detected` are diagnostic-only and never gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub price_above_ema200: bool,
    pub adx_15m: Option<f64>,
    pub adx_1h: Option<f64>,
    pub rsi_15m: Option<f64>,
    pub rsi_1h: Option<f64>,
    /// `|ema_fast - ema_slow| / ema_slow` at the latest candle.
    pub expansion_pct: Option<f64>,
    /// Relative change of the slow EMA between the cross candle and now.
    pub ema200_slope_pct: Option<f64>,
    /// Max single-candle volume around the cross over the trailing baseline mean.
    pub volume_ratio: Option<f64>,
    pub structure_holds: bool,
    pub hold_count: usize,
    pub reclaim_detected: bool,
}

/// Terminal judgment for one crossover. Append-only; one per
/// `(symbol, cross_timestamp)` for the process lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct SignalDecision {
    pub symbol: String,
    pub cross: CrossEvent,
    pub features: FeatureSet,
    pub passed: bool,
    /// Every failing criterion name, in gate order. Empty iff `passed`.
    pub failed_criteria: Vec<&'static str>,
    /// Diagnostic score over all ten criteria. Never influences `passed`.
    pub score: u32,
    /// Latest close / slow EMA at decision time, for alert formatting.
    pub price: Option<f64>,
    pub ema200: Option<f64>,
    pub decided_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timeframe_intervals_match_binance_strings() {
        assert_eq!(Timeframe::M15.interval(), "15m");
        assert_eq!(Timeframe::H1.interval(), "1h");
        assert_eq!(Timeframe::M15.minutes(), 15);
        assert_eq!(Timeframe::H1.minutes(), 60);
    }

    #[test]
    fn latest_skips_warmup_none() {
        let col = vec![None, Some(1.0), Some(2.0)];
        assert_eq!(IndicatorSeries::latest(&col), Some(2.0));
        let warming: Vec<Option<f64>> = vec![None, None];
        assert_eq!(IndicatorSeries::latest(&warming), None);
    }

    #[test]
    fn candles_since_saturates_at_zero() {
        let cross = CrossEvent {
            symbol: "BTCUSDT".into(),
            timeframe: Timeframe::M15,
            cross_index: 40,
            cross_timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        assert_eq!(cross.candles_since(45), 5);
        assert_eq!(cross.candles_since(40), 0);
        assert_eq!(cross.candles_since(39), 0);
    }
}
