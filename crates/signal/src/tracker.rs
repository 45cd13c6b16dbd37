use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use common::CrossEvent;

/// Per-symbol memory that guarantees each crossover is judged exactly once.
///
/// One state value per symbol: the timestamp of the last judged cross,
/// starting empty at process start (in-memory only — a restart forgets
/// judgments, which is why the detector's staleness window exists).
/// `record_judgment` overwrites unconditionally, pass or reject alike: a
/// rejected crossover is never re-offered for evaluation even if later
/// candles would have changed the outcome.
///
/// Entries for distinct symbols are independent and each is read and written
/// once per cycle, so a single short-held lock suffices; no cycle-wide
/// locking is ever needed.
#[derive(Debug, Default)]
pub struct RegimeTracker {
    last_judged: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RegimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True only if this cross is strictly newer than the last judged cross
    /// for the symbol (or no cross has been judged yet).
    pub async fn should_evaluate(&self, cross: &CrossEvent) -> bool {
        let map = self.last_judged.read().await;
        match map.get(&key(&cross.symbol)) {
            Some(&judged) => cross.cross_timestamp > judged,
            None => true,
        }
    }

    /// Mark the cross as judged, regardless of the decision outcome.
    pub async fn record_judgment(&self, cross: &CrossEvent) {
        let mut map = self.last_judged.write().await;
        map.insert(key(&cross.symbol), cross.cross_timestamp);
        debug!(symbol = %cross.symbol, cross_ts = %cross.cross_timestamp, "Judgment recorded");
    }

    /// Number of symbols with a judged cross, for status reporting.
    pub async fn judged_symbols(&self) -> usize {
        self.last_judged.read().await.len()
    }
}

fn key(symbol: &str) -> String {
    symbol.to_uppercase()
}
