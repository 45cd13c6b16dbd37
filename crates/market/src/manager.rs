use std::time::Duration;

use tracing::{debug, warn};

use common::{Candle, Error, IndicatorSeries, Result, Timeframe};
use indicators::{adx_series, ema_series, rsi_series};

use crate::rest::BinanceFuturesClient;

pub const RSI_PERIOD: usize = 14;
pub const ADX_DI_PERIOD: usize = 14;
pub const ADX_PERIOD: usize = 14;

/// Candles requested per timeframe. Enough closed history for the slow EMA
/// to warm up with room for lookback scans on top.
pub const FETCH_LIMIT: usize = 500;

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Fetches klines for both timeframes and assembles index-aligned indicator
/// series. Stateless between calls; every cycle sees fresh data.
pub struct MarketDataManager {
    client: BinanceFuturesClient,
    limit: usize,
    ema_fast_period: usize,
    ema_slow_period: usize,
}

impl MarketDataManager {
    pub fn new(client: BinanceFuturesClient, ema_fast_period: usize, ema_slow_period: usize) -> Self {
        Self {
            client,
            limit: FETCH_LIMIT,
            ema_fast_period,
            ema_slow_period,
        }
    }

    /// Both timeframes for one symbol: `(15m, 1h)`. Transient fetch errors
    /// are retried with exponential backoff before giving up; short history
    /// surfaces as `Error::InsufficientHistory` so callers can skip the
    /// symbol without treating it as a failure.
    pub async fn fetch_series(&self, symbol: &str) -> Result<(IndicatorSeries, IndicatorSeries)> {
        let m15 = self.fetch_one(symbol, Timeframe::M15).await?;
        let h1 = self.fetch_one(symbol, Timeframe::H1).await?;
        Ok((m15, h1))
    }

    async fn fetch_one(&self, symbol: &str, timeframe: Timeframe) -> Result<IndicatorSeries> {
        let candles = self.klines_with_retry(symbol, timeframe).await?;
        build_series(
            symbol,
            timeframe,
            candles,
            self.ema_fast_period,
            self.ema_slow_period,
        )
    }

    async fn klines_with_retry(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Candle>> {
        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 1;
        loop {
            match self.client.klines(symbol, timeframe, self.limit).await {
                Ok(candles) => return Ok(candles),
                Err(e) if e.is_transient() && attempt < RETRY_ATTEMPTS => {
                    warn!(
                        symbol,
                        %timeframe,
                        attempt,
                        error = %e,
                        delay = ?delay,
                        "Kline fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Assemble one `IndicatorSeries` from closed candles. Requires enough
/// history for the slow EMA to produce at least one value; every indicator
/// column is index-aligned with the candles, `None` during warm-up.
pub fn build_series(
    symbol: &str,
    timeframe: Timeframe,
    candles: Vec<Candle>,
    ema_fast_period: usize,
    ema_slow_period: usize,
) -> Result<IndicatorSeries> {
    if candles.len() < ema_slow_period {
        return Err(Error::InsufficientHistory {
            symbol: symbol.to_string(),
            timeframe,
            have: candles.len(),
            need: ema_slow_period,
        });
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let highs: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let lows: Vec<f64> = candles.iter().map(|c| c.low).collect();

    let series = IndicatorSeries {
        symbol: symbol.to_string(),
        timeframe,
        ema_fast: ema_series(&closes, ema_fast_period),
        ema_slow: ema_series(&closes, ema_slow_period),
        adx: adx_series(&highs, &lows, &closes, ADX_DI_PERIOD, ADX_PERIOD),
        rsi: rsi_series(&closes, RSI_PERIOD),
        candles,
    };
    debug_assert!(series.is_aligned());
    debug!(
        symbol,
        %timeframe,
        candles = series.len(),
        "Indicator series assembled"
    );
    Ok(series)
}
