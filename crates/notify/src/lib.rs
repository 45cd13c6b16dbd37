//! Alert delivery: the `Notifier` trait, the Telegram implementation, and a
//! log-only fallback used when no bot token is configured.

mod format;
mod telegram;

pub use format::format_signal_alert;
pub use telegram::TelegramNotifier;

use async_trait::async_trait;
use tracing::info;

use common::{Result, SignalDecision};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a confirmed-signal alert.
    async fn send_signal(&self, decision: &SignalDecision) -> Result<()>;

    /// Deliver a plain status line (startup, shutdown).
    async fn send_status(&self, text: &str) -> Result<()>;
}

/// Fallback notifier: writes alerts to the log instead of delivering them.
/// Keeps the rest of the pipeline identical whether or not Telegram is
/// configured.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_signal(&self, decision: &SignalDecision) -> Result<()> {
        info!(
            symbol = %decision.symbol,
            score = decision.score,
            "Confirmed signal (Telegram not configured):\n{}",
            format_signal_alert(decision)
        );
        Ok(())
    }

    async fn send_status(&self, text: &str) -> Result<()> {
        info!("{text}");
        Ok(())
    }
}
