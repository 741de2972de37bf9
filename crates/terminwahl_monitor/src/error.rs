// --- File: crates/terminwahl_monitor/src/error.rs ---
use terminwahl_common::{external_service_error, internal_error, validation_error, TerminError};
use terminwahl_slots::SlotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    /// Carries the error without its URL, which contains the bot token.
    #[error("Telegram request failed: {0}")]
    Http(reqwest::Error),
    #[error("Telegram returned {status}: {body}")]
    Api { status: u16, body: String },
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err.without_url())
    }
}

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Slot check failed: {0}")]
    Slots(#[from] SlotError),
    #[error("Notification failed: {0}")]
    Notify(#[from] NotifyError),
    #[error("History file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("History format error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Unknown preferred range: {0}")]
    InvalidRange(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("History lock poisoned")]
    LockPoisoned,
}

impl From<NotifyError> for TerminError {
    fn from(err: NotifyError) -> Self {
        external_service_error("telegram", err)
    }
}

impl From<MonitorError> for TerminError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::Slots(e) => TerminError::from(e),
            MonitorError::Notify(e) => TerminError::from(e),
            MonitorError::Io(e) => TerminError::from(e),
            MonitorError::Serialization(e) => TerminError::from(e),
            MonitorError::InvalidRange(_) | MonitorError::InvalidDate(_) => validation_error(err),
            MonitorError::Task(_) | MonitorError::LockPoisoned => internal_error(err),
        }
    }
}
