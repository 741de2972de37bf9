// --- File: crates/terminwahl_common/src/lib.rs ---

pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, validation_error, Context,
    HttpStatusCode, TerminError,
};

pub use http::{
    client::{create_client, HTTP_CLIENT},
    handle_json_result,
};

pub use logging::{init_with_file, init_with_level, log_error, log_result, parse_level};
