use serde::{Deserialize, Serialize};

use common::{Error, Result};

pub use common::config::UniverseConfig;

/// Top-level signal config file (TOML).
///
/// Example `config/signal.toml`:
/// ```toml
/// [thresholds]
/// adx_threshold_15m = 25.0
/// volume_min_ratio = 3.0
///
/// [universe]
/// mode = "top_volume"
/// top_n = 400
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalFileConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub universe: UniverseConfig,
}

/// All detection and gate parameters. Read once at startup; no hot reload.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    /// EMA pair for cross detection: fast crossing above slow.
    pub ema_fast_period: usize,
    pub ema_slow_period: usize,
    /// How many of the newest candles to scan for a crossover.
    pub cross_lookback: usize,
    /// Crosses older than this many candles are stale and never evaluated.
    pub evaluation_window: usize,
    pub adx_threshold_15m: f64,
    pub adx_threshold_1h: f64,
    pub rsi_threshold_15m: f64,
    pub rsi_threshold_1h: f64,
    /// Minimum fast/slow EMA separation, as a ratio (0.002 = 0.2%).
    pub expansion_threshold: f64,
    /// Candles on each side of the cross in the volume spike window.
    pub volume_cross_window: usize,
    /// Trailing candles averaged for the volume baseline.
    pub volume_baseline_period: usize,
    pub volume_min_ratio: f64,
    // Diagnostic-only features
    pub structure_lookback: usize,
    pub structure_min_holds: usize,
    pub reclaim_lookback: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ema_fast_period: 50,
            ema_slow_period: 200,
            cross_lookback: 5,
            evaluation_window: 96,
            adx_threshold_15m: 25.0,
            adx_threshold_1h: 22.0,
            rsi_threshold_15m: 50.0,
            rsi_threshold_1h: 50.0,
            expansion_threshold: 0.002,
            volume_cross_window: 2,
            volume_baseline_period: 50,
            volume_min_ratio: 3.0,
            structure_lookback: 5,
            structure_min_holds: 2,
            reclaim_lookback: 4,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        if self.ema_fast_period == 0 {
            return Err(Error::Config("ema_fast_period must be >= 1".into()));
        }
        if self.ema_fast_period >= self.ema_slow_period {
            return Err(Error::Config(
                "ema_fast_period must be smaller than ema_slow_period".into(),
            ));
        }
        if self.cross_lookback == 0 {
            return Err(Error::Config("cross_lookback must be >= 1".into()));
        }
        if self.evaluation_window == 0 {
            return Err(Error::Config("evaluation_window must be >= 1".into()));
        }
        if self.volume_baseline_period == 0 {
            return Err(Error::Config("volume_baseline_period must be >= 1".into()));
        }
        if self.volume_min_ratio <= 0.0 {
            return Err(Error::Config("volume_min_ratio must be positive".into()));
        }
        if self.expansion_threshold < 0.0 {
            return Err(Error::Config("expansion_threshold must not be negative".into()));
        }
        for (name, v) in [
            ("adx_threshold_15m", self.adx_threshold_15m),
            ("adx_threshold_1h", self.adx_threshold_1h),
            ("rsi_threshold_15m", self.rsi_threshold_15m),
            ("rsi_threshold_1h", self.rsi_threshold_1h),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Config(format!("{name} must be a non-negative number")));
            }
        }
        if self.reclaim_lookback < 2 {
            return Err(Error::Config("reclaim_lookback must be >= 2".into()));
        }
        Ok(())
    }
}

impl SignalFileConfig {
    /// Load and validate from a TOML file. Exits the process on any error —
    /// configuration problems are fatal before polling begins.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read signal config at '{path}': {e}"));
        let cfg: SignalFileConfig = toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse signal config at '{path}': {e}"));
        cfg.validate()
            .unwrap_or_else(|e| panic!("Invalid signal config at '{path}': {e}"));
        cfg
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.universe.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = SignalFileConfig {
            thresholds: Thresholds::default(),
            universe: UniverseConfig::default(),
        };
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.thresholds.volume_min_ratio, 3.0);
        assert_eq!(cfg.thresholds.evaluation_window, 96);
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: SignalFileConfig = toml::from_str(
            r#"
            [thresholds]
            adx_threshold_15m = 30.0

            [universe]
            mode = "custom"
            symbols = ["BTCUSDT", "ETHUSDT"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.thresholds.adx_threshold_15m, 30.0);
        // untouched fields keep defaults
        assert_eq!(cfg.thresholds.rsi_threshold_1h, 50.0);
        match cfg.universe {
            UniverseConfig::Custom { ref symbols } => assert_eq!(symbols.len(), 2),
            ref other => panic!("unexpected universe: {other:?}"),
        }
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_full_defaults() {
        let cfg: SignalFileConfig = toml::from_str("").unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.thresholds, Thresholds::default());
    }

    #[test]
    fn rejects_inverted_ema_pair() {
        let t = Thresholds {
            ema_fast_period: 200,
            ema_slow_period: 50,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_zero_lookback() {
        let t = Thresholds {
            cross_lookback: 0,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_volume_ratio() {
        let t = Thresholds {
            volume_min_ratio: 0.0,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }
}
