// --- File: crates/terminwahl_slots/src/lib.rs ---
pub mod client;
#[cfg(test)]
mod client_test;
pub mod error;
pub mod models;
pub mod render;

pub use client::{FetchOutcome, SlotFetcher};
pub use error::SlotError;
pub use models::{DocumentList, SlotQuery, SlotResponse, TimeSlot};
pub use render::render_slots;
