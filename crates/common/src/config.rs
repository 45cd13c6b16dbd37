use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Process-level configuration loaded from environment variables at startup.
/// Signal thresholds and the symbol universe live in a separate TOML file
/// (see `signal::SignalFileConfig`); this covers credentials and cadence.
///
/// Telegram settings are optional: without a token the bot runs and logs
/// alerts instead of delivering them. The Binance key is optional too — every
/// polled endpoint is public; a key only raises the request-weight allowance.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange credentials (optional, public endpoints work without them)
    pub binance_api_key: Option<String>,

    // Telegram
    pub telegram_token: Option<String>,
    pub telegram_chat_ids: Vec<i64>,

    // Polling
    pub poll_interval_secs: u64,
    /// Bound on concurrent per-symbol fetches (exchange rate-limit budget).
    pub fetch_concurrency: usize,

    // Signal config file path
    pub signal_config_path: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on malformed values with a clear
    /// message — configuration errors are fatal before polling begins.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram_chat_ids = optional_env("TELEGRAM_CHAT_IDS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| {
                        s.trim().parse::<i64>().unwrap_or_else(|_| {
                            panic!("TELEGRAM_CHAT_IDS contains non-numeric ID: '{}'", s.trim())
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Config {
            binance_api_key: optional_env("BINANCE_API_KEY"),
            telegram_token: optional_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_ids,
            poll_interval_secs: optional_env("POLL_INTERVAL_SECS")
                .map(|v| {
                    v.parse().unwrap_or_else(|_| {
                        panic!("POLL_INTERVAL_SECS must be an integer, got: '{v}'")
                    })
                })
                .unwrap_or(60),
            fetch_concurrency: optional_env("FETCH_CONCURRENCY")
                .map(|v| {
                    v.parse().unwrap_or_else(|_| {
                        panic!("FETCH_CONCURRENCY must be an integer, got: '{v}'")
                    })
                })
                .unwrap_or(8),
            signal_config_path: optional_env("SIGNAL_CONFIG_PATH")
                .unwrap_or_else(|| "config/signal.toml".to_string()),
        }
    }

    pub fn telegram_enabled(&self) -> bool {
        self.telegram_token.is_some() && !self.telegram_chat_ids.is_empty()
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Which symbols to monitor. Lives here rather than in the signal crate so
/// the market-data layer can resolve it without a dependency cycle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UniverseConfig {
    /// Top N USDT pairs by 24h quote volume.
    TopVolume { top_n: usize },
    /// An explicit symbol list.
    Custom { symbols: Vec<String> },
    /// Every TRADING USDT pair, optionally floored by 24h quote volume.
    All {
        #[serde(default)]
        min_quote_volume: f64,
    },
}

impl Default for UniverseConfig {
    fn default() -> Self {
        UniverseConfig::TopVolume { top_n: 400 }
    }
}

impl UniverseConfig {
    pub fn validate(&self) -> Result<()> {
        match self {
            UniverseConfig::TopVolume { top_n } if *top_n == 0 => {
                Err(Error::Config("universe top_n must be >= 1".into()))
            }
            UniverseConfig::Custom { symbols } if symbols.is_empty() => {
                Err(Error::Config("universe symbol list is empty".into()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_is_top_400_by_volume() {
        match UniverseConfig::default() {
            UniverseConfig::TopVolume { top_n } => assert_eq!(top_n, 400),
            other => panic!("unexpected default universe: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_custom_universe() {
        let u = UniverseConfig::Custom { symbols: vec![] };
        assert!(u.validate().is_err());
    }
}
