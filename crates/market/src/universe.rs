use tracing::info;

use common::{Result, UniverseConfig};

use crate::rest::{BinanceFuturesClient, SymbolInfo, Ticker24h};

/// Resolve the configured universe into a concrete symbol list. Runs once at
/// startup; the list is fixed for the process lifetime.
pub async fn resolve_universe(
    client: &BinanceFuturesClient,
    cfg: &UniverseConfig,
) -> Result<Vec<String>> {
    let symbols = match cfg {
        UniverseConfig::TopVolume { top_n } => {
            let tickers = client.ticker_24h().await?;
            top_by_quote_volume(tickers, *top_n)
        }
        UniverseConfig::Custom { symbols } => {
            symbols.iter().map(|s| s.trim().to_uppercase()).collect()
        }
        UniverseConfig::All { min_quote_volume } => {
            let info = client.exchange_info().await?;
            let mut symbols = trading_usdt_pairs(info);
            if *min_quote_volume > 0.0 {
                let tickers = client.ticker_24h().await?;
                symbols = floor_by_quote_volume(symbols, tickers, *min_quote_volume);
            }
            symbols
        }
    };

    info!(
        count = symbols.len(),
        sample = ?symbols.iter().take(5).collect::<Vec<_>>(),
        "Symbol universe resolved"
    );
    Ok(symbols)
}

/// Top N USDT pairs by 24h quote volume, descending.
fn top_by_quote_volume(tickers: Vec<Ticker24h>, top_n: usize) -> Vec<String> {
    let mut usdt: Vec<(String, f64)> = tickers
        .into_iter()
        .filter(|t| t.symbol.ends_with("USDT"))
        .map(|t| {
            let vol = t.quote_volume_f64();
            (t.symbol, vol)
        })
        .collect();
    usdt.sort_by(|a, b| b.1.total_cmp(&a.1));
    usdt.into_iter().take(top_n).map(|(s, _)| s).collect()
}

fn trading_usdt_pairs(info: Vec<SymbolInfo>) -> Vec<String> {
    info.into_iter()
        .filter(|s| s.status == "TRADING" && s.quote_asset == "USDT")
        .map(|s| s.symbol)
        .collect()
}

fn floor_by_quote_volume(
    symbols: Vec<String>,
    tickers: Vec<Ticker24h>,
    min_quote_volume: f64,
) -> Vec<String> {
    let volumes: std::collections::HashMap<String, f64> = tickers
        .into_iter()
        .map(|t| {
            let vol = t.quote_volume_f64();
            (t.symbol, vol)
        })
        .collect();

    symbols
        .into_iter()
        .filter(|s| volumes.get(s).copied().unwrap_or(0.0) >= min_quote_volume)
        .collect()
}
