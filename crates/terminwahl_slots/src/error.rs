// --- File: crates/terminwahl_slots/src/error.rs ---
use terminwahl_common::TerminError;
use terminwahl_form::FormError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    Parse(String),
    #[error("Could not encode request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)]
    Form(#[from] FormError),
}

impl From<SlotError> for TerminError {
    fn from(err: SlotError) -> Self {
        match err {
            SlotError::Http(e) => TerminError::from(e),
            SlotError::Parse(message) => TerminError::ParseError(message),
            SlotError::Encode(e) => TerminError::InternalError(e.to_string()),
            SlotError::Form(e) => TerminError::from(e),
        }
    }
}
