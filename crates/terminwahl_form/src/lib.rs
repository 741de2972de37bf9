// --- File: crates/terminwahl_form/src/lib.rs ---
//! View model and utilities of the Terminwahl booking page.
pub mod error;
pub mod fields;
#[cfg(test)]
mod fields_test;
pub mod navigation;
pub mod page;
pub mod registry;
pub mod sanitize;
#[cfg(test)]
mod sanitize_proptest;
pub mod storage;
pub mod timer;
pub mod validate;
pub mod visibility;

pub use error::FormError;
pub use page::{with_page, Key, Page, PageEffect, SharedPage};
pub use registry::{Command, Display, Element, ElementRegistry};
pub use storage::{BrowserStorage, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use timer::{Clock, MaintenanceRedirect, SystemClock, TimerHandle};
