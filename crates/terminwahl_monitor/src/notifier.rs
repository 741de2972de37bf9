// --- File: crates/terminwahl_monitor/src/notifier.rs ---
//! Notification delivery. Telegram is the only channel.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use terminwahl_config::TelegramConfig;
use tracing::{error, info, warn};

use crate::error::NotifyError;
use crate::range::PreferredRange;

/// Telegram rejects longer message texts.
pub const MAX_MESSAGE_CHARS: usize = 4096;
const TRUNCATION_MARK: &str = "… [gekürzt]";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message` to every recipient. `silent` suppresses the alert sound.
    async fn notify(&self, message: &str, silent: bool) -> Result<(), NotifyError>;
}

/// Message for a check that found bookable days.
pub fn format_found(dates: &[NaiveDate], range: PreferredRange, booking_url: &str) -> String {
    let days = dates
        .iter()
        .map(|date| format!("• {}", date.format("%d.%m.%Y")))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "🔔 *Terminprüfung*\n\n✅ *Freie Termine gefunden!*\n\n{days}\n\nZeitraum: {range}\nJetzt buchen: {booking_url}"
    )
}

/// Message for a check without bookable days.
pub fn format_not_found(message: &str) -> String {
    format!("🔔 *Terminprüfung*\n\n❌ Keine freien Termine\n\n{message}")
}

/// Cuts `message` to at most `max_chars` characters, marking the cut.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let keep = max_chars.saturating_sub(TRUNCATION_MARK.chars().count());
    let mut truncated: String = message.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARK);
    truncated
}

pub struct TelegramNotifier {
    client: Client,
    api_base_url: String,
    bot_token: String,
    chat_ids: Vec<i64>,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: &TelegramConfig) -> Self {
        Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_ids: config.chat_ids.clone(),
            retry_attempts: config.retry_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token)
    }

    /// One `sendMessage` call.
    pub async fn send_message(&self, chat_id: i64, text: &str, silent: bool) -> Result<(), NotifyError> {
        let chat_id = chat_id.to_string();
        let text = truncate_message(text, MAX_MESSAGE_CHARS);
        let params = [
            ("chat_id", chat_id.as_str()),
            ("text", text.as_str()),
            ("parse_mode", "Markdown"),
            ("disable_notification", if silent { "true" } else { "false" }),
        ];
        let response = self
            .client
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// `send_message` with up to `retry_attempts` tries, pausing between them.
    pub async fn send_with_retry(&self, chat_id: i64, text: &str, silent: bool) -> Result<(), NotifyError> {
        let mut attempt = 1;
        loop {
            match self.send_message(chat_id, text, silent).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retry_attempts => {
                    warn!("Telegram attempt {} for chat {} failed: {}", attempt, chat_id, e);
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Telegram delivery to chat {} failed after {} attempts: {}", chat_id, attempt, e);
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str, silent: bool) -> Result<(), NotifyError> {
        if self.chat_ids.is_empty() {
            warn!("No Telegram chats configured, dropping notification");
            return Ok(());
        }
        let mut first_error = None;
        for &chat_id in &self.chat_ids {
            if let Err(e) = self.send_with_retry(chat_id, message, silent).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Notification sent to {} chat(s)", self.chat_ids.len());
                Ok(())
            }
        }
    }
}
