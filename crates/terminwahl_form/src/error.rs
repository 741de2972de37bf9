// --- File: crates/terminwahl_form/src/error.rs ---
use terminwahl_common::TerminError;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Element not found: #{0}")]
    ElementNotFound(String),
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<FormError> for TerminError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::ElementNotFound(id) => TerminError::NotFoundError(format!("element #{id}")),
            FormError::InvalidUrl { .. } => TerminError::ValidationError(err.to_string()),
            FormError::Storage(_) => TerminError::InternalError(err.to_string()),
        }
    }
}
