// --- File: crates/terminwahl_monitor/src/lib.rs ---
pub mod checker;
pub mod error;
pub mod handlers;
pub mod history;
pub mod metrics;
pub mod notifier;
pub mod range;
pub mod routes;

pub use checker::{
    CheckResult, MonitorSettings, MonitorStatus, PortalSlotSource, SharedStatus, SlotMonitor,
    SlotSource,
};
pub use error::{MonitorError, NotifyError};
pub use handlers::MonitorState;
pub use history::{AvailabilityRecord, HistoryStore, NotificationState};
pub use metrics::{MetricsSnapshot, MonitorMetrics};
pub use notifier::{Notifier, TelegramNotifier};
pub use range::PreferredRange;
pub use routes::routes;
