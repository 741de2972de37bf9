// --- File: crates/terminwahl_monitor/src/metrics.rs ---
//! Process-wide monitor counters, exposed as JSON and in the Prometheus
//! text format.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

const PREFIX: &str = "terminwahl";

#[derive(Debug, Default)]
pub struct MonitorMetrics {
    checks_total: AtomicU64,
    check_errors_total: AtomicU64,
    /// Sum of check durations in milliseconds
    check_duration_ms_sum: AtomicU64,
    last_check_duration_ms: AtomicU64,
    /// Checks that found at least one bookable day
    slots_found_total: AtomicU64,
    notifications_sent_total: AtomicU64,
    notification_errors_total: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub checks_total: u64,
    pub check_errors_total: u64,
    pub check_duration_ms_sum: u64,
    pub last_check_duration_ms: u64,
    pub slots_found_total: u64,
    pub notifications_sent_total: u64,
    pub notification_errors_total: u64,
}

impl MonitorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one finished check. `found` is `None` for a failed check.
    pub fn record_check(&self, duration: Duration, found: Option<bool>) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.checks_total.fetch_add(1, Ordering::Relaxed);
        self.check_duration_ms_sum.fetch_add(millis, Ordering::Relaxed);
        self.last_check_duration_ms.store(millis, Ordering::Relaxed);
        match found {
            Some(true) => {
                self.slots_found_total.fetch_add(1, Ordering::Relaxed);
            }
            Some(false) => {}
            None => {
                self.check_errors_total.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_notification(&self, delivered: bool) {
        let counter = if delivered {
            &self.notifications_sent_total
        } else {
            &self.notification_errors_total
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            checks_total: self.checks_total.load(Ordering::Relaxed),
            check_errors_total: self.check_errors_total.load(Ordering::Relaxed),
            check_duration_ms_sum: self.check_duration_ms_sum.load(Ordering::Relaxed),
            last_check_duration_ms: self.last_check_duration_ms.load(Ordering::Relaxed),
            slots_found_total: self.slots_found_total.load(Ordering::Relaxed),
            notifications_sent_total: self.notifications_sent_total.load(Ordering::Relaxed),
            notification_errors_total: self.notification_errors_total.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSnapshot {
    /// Renders the counters in the Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();
        let mut metric = |name: &str, kind: &str, help: &str, value: String| {
            let _ = writeln!(out, "# HELP {PREFIX}_{name} {help}");
            let _ = writeln!(out, "# TYPE {PREFIX}_{name} {kind}");
            let _ = writeln!(out, "{PREFIX}_{name} {value}");
        };
        metric("slot_checks_total", "counter", "Slot checks run.", self.checks_total.to_string());
        metric(
            "slot_check_errors_total",
            "counter",
            "Slot checks aborted by an error.",
            self.check_errors_total.to_string(),
        );
        metric(
            "slot_check_duration_seconds_sum",
            "counter",
            "Time spent checking slots.",
            format!("{:.3}", self.check_duration_ms_sum as f64 / 1000.0),
        );
        metric(
            "slot_check_last_duration_seconds",
            "gauge",
            "Duration of the most recent slot check.",
            format!("{:.3}", self.last_check_duration_ms as f64 / 1000.0),
        );
        metric(
            "slots_found_total",
            "counter",
            "Checks that found bookable slots.",
            self.slots_found_total.to_string(),
        );
        metric(
            "notifications_sent_total",
            "counter",
            "Notifications delivered.",
            self.notifications_sent_total.to_string(),
        );
        metric(
            "notification_errors_total",
            "counter",
            "Notifications that failed.",
            self.notification_errors_total.to_string(),
        );
        out
    }
}
