// --- File: crates/terminwahl_monitor/src/history.rs ---
//! Availability history and the last-notification state, both JSON files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::task;
use tracing::{debug, error};

use crate::error::MonitorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub timestamp: DateTime<Utc>,
    pub available: bool,
    pub message: String,
    #[serde(default)]
    pub dates: Vec<NaiveDate>,
}

/// Replaces `path` through a sibling temp file so readers never see a
/// partial document.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), MonitorError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.to_path_buf().into_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// `None` for a missing file.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MonitorError> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

/// Append-only check history, capped to the newest `limit` records.
///
/// File access runs on the blocking pool; clones share one write lock.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
    write_lock: Arc<Mutex<()>>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty history.
    pub async fn load(&self) -> Result<Vec<AvailabilityRecord>, MonitorError> {
        let path = self.path.clone();
        let records = task::spawn_blocking(move || read_json(&path)).await??;
        Ok(records.unwrap_or_default())
    }

    pub async fn append(&self, record: AvailabilityRecord) -> Result<(), MonitorError> {
        let path = self.path.clone();
        let limit = self.limit;
        let write_lock = Arc::clone(&self.write_lock);
        task::spawn_blocking(move || {
            let _guard = write_lock.lock().map_err(|_| MonitorError::LockPoisoned)?;
            let mut history: Vec<AvailabilityRecord> = read_json(&path)?.unwrap_or_default();
            history.push(record);
            if history.len() > limit {
                let excess = history.len() - limit;
                history.drain(..excess);
            }
            write_json(&path, &history)?;
            debug!("History now holds {} records", history.len());
            Ok(())
        })
        .await?
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LastNotification {
    timestamp: DateTime<Utc>,
}

/// Remembers when the last notification went out.
#[derive(Debug, Clone)]
pub struct NotificationState {
    path: PathBuf,
    cooldown: Duration,
}

impl NotificationState {
    pub fn new(path: impl Into<PathBuf>, cooldown: Duration) -> Self {
        Self {
            path: path.into(),
            cooldown,
        }
    }

    /// `None` when nothing was sent yet or the state file is unreadable.
    pub async fn last_notification(&self) -> Option<DateTime<Utc>> {
        let path = self.path.clone();
        let parsed = task::spawn_blocking(move || read_json::<LastNotification>(&path))
            .await
            .map_err(MonitorError::from)
            .and_then(|result| result);
        match parsed {
            Ok(state) => state.map(|state| state.timestamp),
            Err(e) => {
                error!("Could not read notification state {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Positive results always notify; negative ones at most once per cooldown.
    pub async fn should_notify(&self, available: bool, now: DateTime<Utc>) -> bool {
        if available {
            return true;
        }
        match self.last_notification().await {
            Some(last) => now - last >= self.cooldown,
            None => true,
        }
    }

    pub async fn record(&self, now: DateTime<Utc>) -> Result<(), MonitorError> {
        let path = self.path.clone();
        task::spawn_blocking(move || write_json(&path, &LastNotification { timestamp: now })).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(minute: u32, available: bool) -> AvailabilityRecord {
        AvailabilityRecord {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 10, minute, 0).unwrap(),
            available,
            message: format!("check {minute}"),
            dates: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_history_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"), 100);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_keeps_newest_records() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"), 3);
        for minute in 0..5 {
            store.append(record(minute, minute % 2 == 0)).await.unwrap();
        }
        let history = store.load().await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].message, "check 2");
        assert_eq!(history[2].message, "check 4");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_from_clones_are_kept() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("history.json"), 100);

        let appends: Vec<_> = (0..20)
            .map(|minute| {
                let store = store.clone();
                tokio::spawn(async move { store.append(record(minute, false)).await })
            })
            .collect();
        for append in appends {
            append.await.unwrap().unwrap();
        }

        assert_eq!(store.load().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_corrupt_history_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "[{").unwrap();
        assert!(HistoryStore::new(path, 10).load().await.is_err());
    }

    #[tokio::test]
    async fn test_negative_notifications_are_throttled() {
        let dir = tempdir().unwrap();
        let state = NotificationState::new(dir.path().join("last.json"), Duration::hours(6));
        let sent = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

        assert!(state.should_notify(false, sent).await);
        state.record(sent).await.unwrap();
        assert_eq!(state.last_notification().await, Some(sent));

        assert!(!state.should_notify(false, sent + Duration::hours(5)).await);
        assert!(state.should_notify(true, sent + Duration::hours(5)).await);
        assert!(state.should_notify(false, sent + Duration::hours(6)).await);
    }

    #[tokio::test]
    async fn test_unreadable_state_allows_notification() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("last.json");
        fs::write(&path, "not json").unwrap();
        let state = NotificationState::new(path, Duration::hours(6));
        assert!(state.last_notification().await.is_none());
        assert!(state.should_notify(false, Utc::now()).await);
    }
}
