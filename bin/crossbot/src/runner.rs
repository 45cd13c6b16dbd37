use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{stream, StreamExt};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use common::Error;
use market::MarketDataManager;
use notify::Notifier;
use signal::{compute_features, detect_bullish_cross, evaluate, snapshot};
use signal::{Detection, RegimeTracker, Thresholds};

/// The polling loop: every interval, run the full pipeline over the symbol
/// universe with bounded fetch concurrency. Symbols never affect each other;
/// one failure is logged and the cycle moves on.
pub struct Runner {
    pub manager: MarketDataManager,
    pub tracker: RegimeTracker,
    pub notifier: Arc<dyn Notifier>,
    pub thresholds: Thresholds,
    pub symbols: Vec<String>,
    pub poll_interval: Duration,
    pub fetch_concurrency: usize,
}

/// Per-symbol cycle result, tallied for the cycle summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// No actionable cross this cycle (none found, stale, already judged,
    /// or not enough history yet).
    Quiet,
    Confirmed,
    Rejected,
    Failed,
}

impl Runner {
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => self.run_cycle().await,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Runner stopping");
                        return;
                    }
                }
            }
        }
    }

    /// One pass over the whole universe. Runs to completion even when a
    /// shutdown arrives mid-cycle; in-flight symbols are drained, not dropped.
    async fn run_cycle(&self) {
        let started = Instant::now();
        let outcomes: Vec<Outcome> = stream::iter(0..self.symbols.len())
            .map(|i| self.process_symbol(self.symbols[i].as_str()))
            .buffer_unordered(self.fetch_concurrency)
            .collect()
            .await;

        let count = |o: Outcome| outcomes.iter().filter(|&&x| x == o).count();
        let judged_total = self.tracker.judged_symbols().await;
        info!(
            symbols = self.symbols.len(),
            confirmed = count(Outcome::Confirmed),
            rejected = count(Outcome::Rejected),
            failed = count(Outcome::Failed),
            judged_total,
            elapsed = ?started.elapsed(),
            "Cycle complete"
        );
    }

    async fn process_symbol(&self, symbol: &str) -> Outcome {
        let (m15, h1) = match self.manager.fetch_series(symbol).await {
            Ok(pair) => pair,
            Err(Error::InsufficientHistory {
                have, need, ..
            }) => {
                debug!(symbol, have, need, "Not enough history, skipping");
                return Outcome::Quiet;
            }
            Err(e) => {
                warn!(symbol, error = %e, "Fetch failed, skipping symbol this cycle");
                return Outcome::Failed;
            }
        };

        let cross = match detect_bullish_cross(
            &m15,
            self.thresholds.cross_lookback,
            self.thresholds.evaluation_window,
        ) {
            Detection::Cross(cross) => cross,
            Detection::Stale(cross) => {
                debug!(symbol, cross_ts = %cross.cross_timestamp, "Stale crossover ignored");
                return Outcome::Quiet;
            }
            Detection::NoCross | Detection::InsufficientData => return Outcome::Quiet,
        };

        if !self.tracker.should_evaluate(&cross).await {
            return Outcome::Quiet;
        }

        let features = compute_features(&cross, &m15, &h1, &self.thresholds);
        let snap = snapshot(&m15);
        let decision = evaluate(cross.clone(), features, snap, &self.thresholds);
        self.tracker.record_judgment(&cross).await;

        if decision.passed {
            info!(
                symbol,
                score = decision.score,
                cross_ts = %cross.cross_timestamp,
                "Signal confirmed"
            );
            if let Err(e) = self.notifier.send_signal(&decision).await {
                warn!(symbol, error = %e, "Failed to deliver signal alert");
            }
            Outcome::Confirmed
        } else {
            info!(
                symbol,
                score = decision.score,
                failed = ?decision.failed_criteria,
                cross_ts = %cross.cross_timestamp,
                "Crossover rejected"
            );
            Outcome::Rejected
        }
    }
}
