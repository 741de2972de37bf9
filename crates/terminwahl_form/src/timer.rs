// --- File: crates/terminwahl_form/src/timer.rs ---
//! Countdown displays, delayed activation, the maintenance redirect and the
//! please-wait overlay.
//!
//! Every timer runs as a tokio task owned by a [`TimerHandle`]; dropping the
//! handle stops the timer. All functions that start a timer must be called
//! from within a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::FormError;
use crate::page::{with_page, PageEffect, SharedPage};
use crate::registry::{Display, Element};
use crate::storage::BrowserStorage;

pub const MAINTENANCE_PAGE: &str = "wartung.php";
pub const NOT_ACTIVE_CLASS: &str = "not-active";
pub const WAIT_HINT_ID: &str = "waithint";
pub const OVERLAY_ID: &str = "pleasewait-overlay";
pub const HINT_ID: &str = "pleasewait-hint";

const TICK: Duration = Duration::from_secs(1);
const OVERLAY_FADE_DELAY: Duration = Duration::from_millis(50);
const HINT_FADE_DELAY: Duration = Duration::from_millis(500);

const OVERLAY_CSS: &str = "position:absolute;width:100vw;height:100%;opacity:0.3;z-index:100;\
background:#000;top:0em;transition:opacity 5s;";
const HINT_CSS: &str = "position:fixed;width:auto;z-index:101;background:#FFF;top: 40%;\
text-align: center;line-height: 3em; left: 40%; border: 4px gray outset; \
border-radius: 1em; padding: 2em;opacity:0.0;transition:opacity 1s;";

/// Source of wall-clock milliseconds.
pub trait Clock: Send + Sync + 'static {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Owns a running timer task. The task is aborted when the handle is dropped.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    fn spawn<F>(future: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    pub fn cancel(self) {
        // Drop aborts
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// `MM:SS`, zero padded. Negative remaining time shows `00:00`.
pub fn format_countdown(remaining_secs: i64) -> String {
    let minutes = remaining_secs / 60;
    let seconds = remaining_secs % 60;
    if minutes >= 0 && seconds >= 0 {
        format!("{minutes:02}:{seconds:02}")
    } else {
        "00:00".to_string()
    }
}

fn write_countdown(page: &SharedPage, elem: &str, remaining_secs: i64) {
    with_page(page, |page| match page.element_mut(elem) {
        Some(display) => display.inner_html = format_countdown(remaining_secs),
        None => warn!("Countdown element {} disappeared", elem),
    });
}

/// Counts down from `duration` in `elem`, once per second, first update after
/// one second. Keeps showing `00:00` after expiry until the handle is dropped.
pub fn start_timer(
    page: &SharedPage,
    duration: Duration,
    elem: &str,
) -> Result<TimerHandle, FormError> {
    with_page(page, |page| page.registry().require(elem).map(|_| ()))?;

    let page = Arc::clone(page);
    let elem = elem.to_string();
    let mut remaining = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
    Ok(TimerHandle::spawn(async move {
        let mut ticks = interval_at(Instant::now() + TICK, TICK);
        loop {
            ticks.tick().await;
            write_countdown(&page, &elem, remaining);
            remaining -= 1;
        }
    }))
}

/// A countdown anchored to a start timestamp kept in session storage.
#[derive(Debug)]
pub struct SessionTimer {
    pub key: String,
    pub handle: TimerHandle,
}

/// Like [`start_timer`], but the remaining time is recomputed each second from
/// the start timestamp (milliseconds) stored under a random session key.
pub fn start_session_timer(
    page: &SharedPage,
    storage: &BrowserStorage,
    clock: Arc<dyn Clock>,
    duration: Duration,
    elem: &str,
) -> Result<SessionTimer, FormError> {
    with_page(page, |page| page.registry().require(elem).map(|_| ()))?;

    let key = Uuid::new_v4().to_string();
    let started = clock.now_millis();
    storage.save_to_session_storage(&key, Some(&started.to_string()));
    debug!("Session timer {} started at {}", key, started);

    let page = Arc::clone(page);
    let storage = storage.clone();
    let elem = elem.to_string();
    let task_key = key.clone();
    let duration_ms = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
    let handle = TimerHandle::spawn(async move {
        let mut ticks = interval_at(Instant::now() + TICK, TICK);
        loop {
            ticks.tick().await;
            // A lost start timestamp counts as expired
            let started = storage
                .get_from_session_storage(&task_key)
                .and_then(|value| value.parse::<i64>().ok())
                .unwrap_or(0);
            let remaining_ms = duration_ms - (clock.now_millis() - started);
            write_countdown(&page, &elem, remaining_ms / 1000);
        }
    });
    Ok(SessionTimer { key, handle })
}

/// After `minutes`, removes `not-active` from `id` and hides the wait hint.
pub fn set_active(page: &SharedPage, id: &str, minutes: u64) -> Result<TimerHandle, FormError> {
    with_page(page, |page| page.registry().require(id).map(|_| ()))?;

    let page = Arc::clone(page);
    let id = id.to_string();
    Ok(TimerHandle::spawn(async move {
        sleep(Duration::from_secs(minutes.saturating_mul(60))).await;
        with_page(&page, |page| {
            if let Some(element) = page.element_mut(&id) {
                element.classes.remove(NOT_ACTIVE_CLASS);
            }
            if let Some(hint) = page.element_mut(WAIT_HINT_ID) {
                hint.set_display(Display::None, false);
            }
        });
        debug!("{} activated", id);
    }))
}

/// Sends the page to the maintenance notice after a delay, unless stopped.
#[derive(Debug)]
pub struct MaintenanceRedirect {
    page: SharedPage,
    pending: Option<TimerHandle>,
}

impl MaintenanceRedirect {
    pub fn new(page: SharedPage) -> Self {
        Self {
            page,
            pending: None,
        }
    }

    /// Schedules the redirect in `secs` seconds, replacing a pending one.
    pub fn arm(&mut self, secs: u64) -> Result<(), FormError> {
        let target = with_page(&self.page, |page| page.resolve(MAINTENANCE_PAGE))?;
        let page = Arc::clone(&self.page);
        info!("Maintenance redirect to {} in {}s", target, secs);
        self.pending = Some(TimerHandle::spawn(async move {
            sleep(Duration::from_secs(secs)).await;
            with_page(&page, |page| {
                page.emit(PageEffect::Navigate {
                    url: target.to_string(),
                })
            });
        }));
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.pending.take().is_some() {
            info!("Maintenance redirect cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

/// Covers the page with a dimmed overlay and shows `html` in a hint box.
pub fn please_wait(page: &SharedPage, html: &str) -> TimerHandle {
    with_page(page, |page| {
        let mut overlay = Element::new(OVERLAY_ID, "div");
        overlay.style.css_text = Some(OVERLAY_CSS.to_string());
        overlay.style.opacity = Some("0.3".to_string());
        let mut hint = Element::new(HINT_ID, "div").with_html(html);
        hint.style.css_text = Some(HINT_CSS.to_string());
        hint.style.opacity = Some("0.0".to_string());
        page.add(overlay);
        page.add(hint);
    });

    let page = Arc::clone(page);
    TimerHandle::spawn(async move {
        sleep(OVERLAY_FADE_DELAY).await;
        set_opacity(&page, OVERLAY_ID, "0.7");
        sleep(HINT_FADE_DELAY - OVERLAY_FADE_DELAY).await;
        set_opacity(&page, HINT_ID, "1.0");
    })
}

fn set_opacity(page: &SharedPage, id: &str, opacity: &str) {
    with_page(page, |page| {
        if let Some(element) = page.element_mut(id) {
            element.style.opacity = Some(opacity.to_string());
        }
    });
}
