use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::{info, warn};

use common::{Error, Result, SignalDecision};

use crate::format::format_signal_alert;
use crate::Notifier;

/// Delivers alerts to a fixed set of Telegram chats. Send failures to
/// individual chats are logged and skipped; the error surfaces only when no
/// chat received the message.
pub struct TelegramNotifier {
    bot: Bot,
    chat_ids: Vec<ChatId>,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_ids: &[i64]) -> Self {
        let notifier = Self {
            bot: Bot::new(token),
            chat_ids: chat_ids.iter().map(|&id| ChatId(id)).collect(),
        };
        info!(chats = notifier.chat_ids.len(), "Telegram notifier ready");
        notifier
    }

    async fn broadcast(&self, text: &str) -> Result<()> {
        let mut delivered = 0usize;
        for &chat_id in &self.chat_ids {
            match self.bot.send_message(chat_id, text).await {
                Ok(_) => delivered += 1,
                Err(e) => {
                    warn!(chat_id = chat_id.0, error = %e, "Failed to send Telegram message");
                }
            }
        }
        if delivered == 0 {
            return Err(Error::Notify(format!(
                "message not delivered to any of {} chats",
                self.chat_ids.len()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_signal(&self, decision: &SignalDecision) -> Result<()> {
        self.broadcast(&format_signal_alert(decision)).await
    }

    async fn send_status(&self, text: &str) -> Result<()> {
        self.broadcast(text).await
    }
}
