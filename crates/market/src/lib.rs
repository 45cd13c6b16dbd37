//! Binance USDⓈ-M futures market data: REST client, symbol-universe
//! selection, and the manager that turns raw klines into indicator series.

pub mod manager;
pub mod rest;
pub mod universe;

pub use manager::MarketDataManager;
pub use rest::BinanceFuturesClient;
pub use universe::resolve_universe;
