//! The signal-detection core: cross detection, feature extraction anchored to
//! the cross, the eight-criterion gate, diagnostic scoring, and the
//! per-symbol regime tracker that guarantees each crossover is judged
//! exactly once.

pub mod config;
pub mod detector;
pub mod evaluator;
pub mod features;
pub mod scoring;
pub mod tracker;

pub use config::{SignalFileConfig, Thresholds, UniverseConfig};
pub use detector::{detect_bullish_cross, Detection};
pub use evaluator::evaluate;
pub use features::{compute_features, snapshot, Snapshot};
pub use scoring::{score, MAX_SCORE};
pub use tracker::RegimeTracker;
