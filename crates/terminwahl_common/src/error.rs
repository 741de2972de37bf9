// --- File: crates/terminwahl_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Terminwahl errors.
///
/// Each crate keeps its own error enum and implements `From<SpecificError>`
/// for `TerminError` where errors cross a crate boundary.
#[derive(Error, Debug)]
pub enum TerminError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a timeout
    #[error("Timeout: {0}")]
    TimeoutError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for TerminError {
    fn status_code(&self) -> u16 {
        match self {
            TerminError::HttpError(_) => 502,
            TerminError::ParseError(_) => 502,
            TerminError::ConfigError(_) => 500,
            TerminError::ValidationError(_) => 400,
            TerminError::ExternalServiceError { .. } => 502,
            TerminError::TimeoutError(_) => 504,
            TerminError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| TerminError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| TerminError::InternalError(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<reqwest::Error> for TerminError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TerminError::TimeoutError(err.to_string())
        } else {
            TerminError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TerminError {
    fn from(err: serde_json::Error) -> Self {
        TerminError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for TerminError {
    fn from(err: std::io::Error) -> Self {
        TerminError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> TerminError {
    TerminError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> TerminError {
    TerminError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> TerminError {
    TerminError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> TerminError {
    TerminError::InternalError(message.to_string())
}
