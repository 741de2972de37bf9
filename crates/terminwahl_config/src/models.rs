// --- File: crates/terminwahl_config/src/models.rs ---

use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Booking Portal Config ---
// The page the booking form lives on; the ajax endpoints are resolved relative to it.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PortalConfig {
    pub page_url: String, // e.g. https://lbv-termine.de/frontend/terminauswahl.php
    pub service_id: u32, // Anliegen
    #[serde(default)]
    pub location_id: i64, // Standort, 0 when no location is pre-selected
    #[serde(default)]
    pub opening_hours_ids: Vec<u32>,
    #[serde(default)]
    pub token: String, // CSRF token, usually "secret_from_env"
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// --- Slot Monitor Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_interval_min_secs")]
    pub interval_min_secs: u64,
    #[serde(default = "default_interval_max_secs")]
    pub interval_max_secs: u64,
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    #[serde(default = "default_preferred_range")]
    pub preferred_range: String, // week | two_weeks | month | any
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    #[serde(default = "default_notification_state_file")]
    pub notification_state_file: PathBuf,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_negative_cooldown_hours")]
    pub negative_cooldown_hours: i64,
    #[serde(default = "default_error_pause_secs")]
    pub error_pause_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_min_secs: default_interval_min_secs(),
            interval_max_secs: default_interval_max_secs(),
            lookahead_days: default_lookahead_days(),
            preferred_range: default_preferred_range(),
            history_file: default_history_file(),
            notification_state_file: default_notification_state_file(),
            history_limit: default_history_limit(),
            negative_cooldown_hours: default_negative_cooldown_hours(),
            error_pause_secs: default_error_pause_secs(),
        }
    }
}

// --- Telegram Config ---
// Bot token loaded from env var: TERMINWAHL_SECRET_TELEGRAM_BOT_TOKEN or TELEGRAM_BOT_TOKEN
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    #[serde(default)]
    pub chat_ids: Vec<i64>,
    #[serde(default = "default_telegram_api_base")]
    pub api_base_url: String,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub directory: Option<PathBuf>, // daily rotated log file when set
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_monitor: bool,
    #[serde(default)]
    pub use_telegram: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub portal: Option<PortalConfig>,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Checks the cross-field constraints `serde` cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.interval_min_secs > self.monitor.interval_max_secs {
            return Err(ConfigError::Message(format!(
                "monitor.interval_min_secs ({}) exceeds monitor.interval_max_secs ({})",
                self.monitor.interval_min_secs, self.monitor.interval_max_secs
            )));
        }
        if self.use_monitor && self.portal.is_none() {
            return Err(ConfigError::Message(
                "use_monitor is set but the [portal] section is missing".to_string(),
            ));
        }
        if self.use_telegram {
            let telegram = self.telegram.as_ref().ok_or_else(|| {
                ConfigError::Message("use_telegram is set but [telegram] is missing".to_string())
            })?;
            validate_bot_token(&telegram.bot_token)?;
        }
        Ok(())
    }
}

/// A bot token looks like `<numeric bot id>:<secret>`.
pub fn validate_bot_token(token: &str) -> Result<(), ConfigError> {
    let Some((bot_id, secret)) = token.split_once(':') else {
        return Err(ConfigError::Message(
            "telegram.bot_token must contain ':'".to_string(),
        ));
    };
    if bot_id.is_empty() || !bot_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::Message(
            "telegram.bot_token must start with the numeric bot id".to_string(),
        ));
    }
    if secret.is_empty() {
        return Err(ConfigError::Message(
            "telegram.bot_token has an empty secret part".to_string(),
        ));
    }
    Ok(())
}

fn default_language() -> String {
    "de".to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_interval_min_secs() -> u64 {
    120
}
fn default_interval_max_secs() -> u64 {
    240
}
fn default_lookahead_days() -> u32 {
    31
}
fn default_preferred_range() -> String {
    "any".to_string()
}
fn default_history_file() -> PathBuf {
    PathBuf::from("booking_history.json")
}
fn default_notification_state_file() -> PathBuf {
    PathBuf::from("last_notification.json")
}
fn default_history_limit() -> usize {
    100
}
fn default_negative_cooldown_hours() -> i64 {
    6
}
fn default_error_pause_secs() -> u64 {
    60
}
fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_secs() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".to_string()
}
