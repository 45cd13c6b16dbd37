use thiserror::Error;

use crate::Timeframe;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Exchange API error: {0}")]
    Exchange(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Not enough closed candles for indicator warm-up. Expected during the
    /// first hours of a newly listed symbol — callers skip without mutating
    /// any state and without logging it as a failure.
    #[error("insufficient history for {symbol} {timeframe}: have {have}, need {need}")]
    InsufficientHistory {
        symbol: String,
        timeframe: Timeframe,
        have: usize,
        need: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification error: {0}")]
    Notify(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// Transient errors are retried with backoff; everything else is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Exchange(_))
    }
}
