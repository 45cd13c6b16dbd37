//! Full-series indicator math: EMA, RSI and ADX over a closed-candle series.
//!
//! Each function returns one slot per input candle, index-aligned with the
//! input. Slots before the indicator has warmed up are `None` — consumers
//! must treat them as unavailable, never as zero.

pub mod adx;
pub mod ema;
pub mod rsi;

pub use adx::adx_series;
pub use ema::ema_series;
pub use rsi::rsi_series;
