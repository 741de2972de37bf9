// --- File: crates/terminwahl_monitor/src/checker.rs ---
//! The slot monitor: checks the look-ahead window, records the result and
//! decides whether to notify, then waits a random interval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;
use terminwahl_common::{log_error, log_result};
use terminwahl_config::MonitorConfig;
use terminwahl_form::validate::today_in_office_tz;
use terminwahl_slots::{FetchOutcome, SlotError, SlotFetcher, SlotQuery};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::MonitorError;
use crate::history::{AvailabilityRecord, HistoryStore, NotificationState};
use crate::metrics::MonitorMetrics;
use crate::notifier::{format_found, format_not_found, Notifier};
use crate::range::{dates_in_range, PreferredRange};

/// Where the monitor gets slots for a day from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotSource: Send + Sync {
    async fn fetch(&self, date: NaiveDate) -> Result<FetchOutcome, SlotError>;
}

/// Slot source backed by the booking portal, with a fixed query.
pub struct PortalSlotSource {
    fetcher: SlotFetcher,
    query: SlotQuery,
}

impl PortalSlotSource {
    pub fn new(fetcher: SlotFetcher, query: SlotQuery) -> Self {
        Self { fetcher, query }
    }
}

#[async_trait]
impl SlotSource for PortalSlotSource {
    async fn fetch(&self, date: NaiveDate) -> Result<FetchOutcome, SlotError> {
        self.fetcher.fetch_slots(&self.query.for_date(date)).await
    }
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub interval_min: Duration,
    pub interval_max: Duration,
    pub lookahead_days: u32,
    pub preferred_range: PreferredRange,
    pub error_pause: Duration,
    /// Linked in notifications.
    pub booking_url: String,
}

impl MonitorSettings {
    pub fn from_config(config: &MonitorConfig, booking_url: &str) -> Self {
        Self {
            interval_min: Duration::from_secs(config.interval_min_secs),
            interval_max: Duration::from_secs(config.interval_max_secs),
            lookahead_days: config.lookahead_days,
            preferred_range: PreferredRange::parse_lenient(&config.preferred_range),
            error_pause: Duration::from_secs(config.error_pause_secs),
            booking_url: booking_url.to_string(),
        }
    }
}

/// Outcome of one pass over the look-ahead window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub checked_at: DateTime<Utc>,
    /// Days with at least one bookable slot, ascending.
    pub dates: Vec<NaiveDate>,
    pub days_checked: u32,
    pub session_errors: u32,
}

impl CheckResult {
    pub fn available(&self) -> bool {
        !self.dates.is_empty()
    }

    pub fn message(&self) -> String {
        let mut message = if self.available() {
            format!("{} von {} Tagen mit freien Terminen", self.dates.len(), self.days_checked)
        } else {
            format!("{} Tage ohne freie Termine", self.days_checked)
        };
        if self.session_errors > 0 {
            message.push_str(&format!(" ({} Sitzungsfehler)", self.session_errors));
        }
        message
    }
}

/// Snapshot served by the status route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStatus {
    pub running: bool,
    pub checks_run: u64,
    pub last_check: Option<DateTime<Utc>>,
    pub last_available: Option<bool>,
    pub last_dates: Vec<NaiveDate>,
    pub last_error: Option<String>,
    pub next_check: Option<DateTime<Utc>>,
}

pub type SharedStatus = Arc<RwLock<MonitorStatus>>;

pub struct SlotMonitor {
    source: Arc<dyn SlotSource>,
    notifier: Option<Arc<dyn Notifier>>,
    history: HistoryStore,
    notification_state: NotificationState,
    settings: MonitorSettings,
    status: SharedStatus,
    metrics: Arc<MonitorMetrics>,
    /// Keeps scheduled and on-demand checks from overlapping.
    check_lock: Mutex<()>,
}

impl SlotMonitor {
    pub fn new(
        source: Arc<dyn SlotSource>,
        notifier: Option<Arc<dyn Notifier>>,
        history: HistoryStore,
        notification_state: NotificationState,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            source,
            notifier,
            history,
            notification_state,
            settings,
            status: Arc::new(RwLock::new(MonitorStatus::default())),
            metrics: Arc::new(MonitorMetrics::new()),
            check_lock: Mutex::new(()),
        }
    }

    pub fn status(&self) -> SharedStatus {
        Arc::clone(&self.status)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn metrics(&self) -> Arc<MonitorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Fetches every day of the look-ahead window starting at `today`.
    ///
    /// Session errors and unexpected statuses count as days without slots.
    /// Transport and parse errors abort the pass.
    pub async fn check_once(&self, today: NaiveDate) -> Result<CheckResult, MonitorError> {
        let mut dates = Vec::new();
        let mut session_errors = 0;
        for offset in 0..self.settings.lookahead_days {
            let Some(date) = today.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            match self.source.fetch(date).await? {
                FetchOutcome::Slots(slots) => {
                    if slots.iter().any(|slot| slot.buchbar) {
                        dates.push(date);
                    }
                }
                FetchOutcome::SessionExpired => {
                    warn!("Session error while checking {}", date);
                    session_errors += 1;
                }
                FetchOutcome::Unhandled(status) => {
                    warn!("Status {} while checking {}", status, date);
                }
            }
        }
        Ok(CheckResult {
            checked_at: Utc::now(),
            dates,
            days_checked: self.settings.lookahead_days,
            session_errors,
        })
    }

    /// Records `result` and sends a notification when due. Returns whether
    /// a notification went out.
    pub async fn handle_result(&self, result: &CheckResult, today: NaiveDate, now: DateTime<Utc>) -> bool {
        let record = AvailabilityRecord {
            timestamp: result.checked_at,
            available: result.available(),
            message: result.message(),
            dates: result.dates.clone(),
        };
        if let Err(e) = self.history.append(record).await {
            log_error(e, "Could not save history");
        }

        let (due, silent, text) = if result.available() {
            let preferred = dates_in_range(&result.dates, self.settings.preferred_range, today);
            let text = format_found(
                &result.dates,
                self.settings.preferred_range,
                &self.settings.booking_url,
            );
            (true, !preferred, text)
        } else {
            let due = self.notification_state.should_notify(false, now).await;
            (due, true, format_not_found(&result.message()))
        };
        if !due {
            debug!("Negative notification suppressed by cooldown");
            return false;
        }

        let Some(notifier) = &self.notifier else {
            info!("{}", result.message());
            return false;
        };
        let delivered = notifier.notify(&text, silent).await;
        self.metrics.record_notification(delivered.is_ok());
        match delivered {
            Ok(()) => {
                if let Err(e) = self.notification_state.record(now).await {
                    log_error(e, "Could not save notification time");
                }
                true
            }
            Err(e) => {
                log_error(e, "Notification failed");
                false
            }
        }
    }

    /// One check with history, notification, metrics and status update.
    /// Waits for a check already in progress.
    pub async fn run_check(&self, today: NaiveDate) -> Result<CheckResult, MonitorError> {
        let _running = self.check_lock.lock().await;
        let started = Instant::now();
        let outcome = log_result(self.check_once(today).await, "Slot check finished", "Slot check failed");
        self.metrics
            .record_check(started.elapsed(), outcome.as_ref().ok().map(CheckResult::available));
        if let Ok(result) = &outcome {
            info!("{}", result.message());
            if self.handle_result(result, today, Utc::now()).await {
                debug!("Notification sent for check at {}", result.checked_at);
            }
        }

        let mut status = self.status.write().await;
        status.checks_run += 1;
        status.last_check = Some(Utc::now());
        match &outcome {
            Ok(result) => {
                status.last_available = Some(result.available());
                status.last_dates = result.dates.clone();
                status.last_error = None;
            }
            Err(e) => status.last_error = Some(e.to_string()),
        }
        outcome
    }

    /// Random pause between checks, within the configured bounds.
    pub fn next_interval(&self) -> Duration {
        let min = self.settings.interval_min.as_secs();
        let max = self.settings.interval_max.as_secs().max(min);
        Duration::from_secs(rand::thread_rng().gen_range(min..=max))
    }

    /// Checks until `stop` turns true or its sender is dropped.
    pub async fn run(&self, mut stop: watch::Receiver<bool>) {
        info!(
            "Slot monitor started: {} days ahead, range {}",
            self.settings.lookahead_days, self.settings.preferred_range
        );
        self.status.write().await.running = true;

        loop {
            let stopped = *stop.borrow();
            if stopped {
                break;
            }
            let pause = match self.run_check(today_in_office_tz()).await {
                Ok(_) => self.next_interval(),
                Err(_) => self.settings.error_pause,
            };
            info!("Next check in {} seconds", pause.as_secs());
            self.status.write().await.next_check = chrono::Duration::from_std(pause)
                .ok()
                .map(|pause| Utc::now() + pause);

            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        let mut status = self.status.write().await;
        status.running = false;
        status.next_check = None;
        info!("Slot monitor stopped");
    }
}
