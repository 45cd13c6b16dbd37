use std::time::Duration;

use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use common::{Candle, Error, Result, Timeframe};

const BASE_URL: &str = "https://fapi.binance.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the Binance USDⓈ-M futures API. All endpoints the bot
/// uses are public; the API key header is attached when configured, which
/// grants a higher request-weight allowance.
pub struct BinanceFuturesClient {
    api_key: Option<String>,
    http: Client,
}

impl BinanceFuturesClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: Client::builder()
                .use_rustls_tls()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn get(&self, path: &str, query: &str) -> Result<String> {
        let url = if query.is_empty() {
            format!("{BASE_URL}{path}")
        } else {
            format!("{BASE_URL}{path}?{query}")
        };

        let mut req = self.http.get(&url);
        if let Some(key) = &self.api_key {
            req = req.header("X-MBX-APIKEY", key);
        }

        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Exchange(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }

    /// Connectivity check. Fails fast with the exchange's own error text so
    /// startup diagnostics are actionable.
    pub async fn ping(&self) -> Result<()> {
        self.get("/fapi/v1/ping", "").await.map(|_| ())
    }

    /// All symbols currently tradable on the futures exchange.
    pub async fn exchange_info(&self) -> Result<Vec<SymbolInfo>> {
        let body = self.get("/fapi/v1/exchangeInfo", "").await?;
        let info: ExchangeInfo = serde_json::from_str(&body)?;
        Ok(info.symbols)
    }

    /// 24h rolling-window statistics for every symbol.
    pub async fn ticker_24h(&self) -> Result<Vec<Ticker24h>> {
        let body = self.get("/fapi/v1/ticker/24hr", "").await?;
        let tickers: Vec<Ticker24h> = serde_json::from_str(&body)?;
        Ok(tickers)
    }

    /// Closed klines for a symbol, oldest first. The exchange includes the
    /// still-forming candle as the last row; it is dropped here so callers
    /// only ever see closed candles.
    pub async fn klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let query = format!(
            "symbol={symbol}&interval={}&limit={limit}",
            timeframe.interval()
        );
        let body = self.get("/fapi/v1/klines", &query).await?;
        let rows: Vec<Vec<Value>> = serde_json::from_str(&body)?;

        let now_ms = Utc::now().timestamp_millis();
        let mut candles = Vec::with_capacity(rows.len());
        for row in &rows {
            let (candle, close_time_ms) = parse_kline(row)?;
            if close_time_ms <= now_ms {
                candles.push(candle);
            }
        }

        debug!(symbol, %timeframe, count = candles.len(), "Fetched klines");
        Ok(candles)
    }
}

/// One kline row is a heterogeneous JSON array:
/// `[open_time, open, high, low, close, volume, close_time, ...]`
/// with prices and volume as strings. Returns the candle plus its close
/// time so the caller can discard the still-forming row.
fn parse_kline(row: &[Value]) -> Result<(Candle, i64)> {
    let int = |i: usize| -> Result<i64> {
        row.get(i)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::Exchange(format!("malformed kline field {i}")))
    };
    let num = |i: usize| -> Result<f64> {
        row.get(i)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::Exchange(format!("malformed kline field {i}")))
    };

    let open_time = Utc
        .timestamp_millis_opt(int(0)?)
        .single()
        .ok_or_else(|| Error::Exchange("kline open time out of range".into()))?;

    let candle = Candle {
        open_time,
        open: num(1)?,
        high: num(2)?,
        low: num(3)?,
        close: num(4)?,
        volume: num(5)?,
    };
    Ok((candle, int(6)?))
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub quote_asset: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    pub quote_volume: String,
}

impl Ticker24h {
    pub fn quote_volume_f64(&self) -> f64 {
        self.quote_volume.parse().unwrap_or(0.0)
    }
}
