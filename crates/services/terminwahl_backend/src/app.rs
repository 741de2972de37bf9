// --- File: crates/services/terminwahl_backend/src/app.rs ---
//! Wires configuration into the monitor and the HTTP router.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use terminwahl_common::{config_error, create_client, Context, TerminError, HTTP_CLIENT};
use terminwahl_config::AppConfig;
use terminwahl_monitor::{
    HistoryStore, MonitorSettings, MonitorState, Notifier, NotificationState, PortalSlotSource,
    SlotMonitor, TelegramNotifier,
};
use terminwahl_slots::{SlotFetcher, SlotQuery};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    monitor: bool,
    time: String,
}

async fn health(State(config): State<Arc<AppConfig>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        monitor: config.use_monitor,
        time: Utc::now().to_rfc3339(),
    })
}

/// Builds the slot monitor when it is enabled. Telegram is attached only
/// when `use_telegram` is set and configured.
pub fn build_monitor(config: &AppConfig) -> Result<Option<Arc<SlotMonitor>>, TerminError> {
    if !config.use_monitor {
        info!("Slot monitor disabled");
        return Ok(None);
    }
    let portal = config
        .portal
        .as_ref()
        .ok_or_else(|| config_error("use_monitor is set but [portal] is missing"))?;

    let client = create_client(portal.request_timeout_secs, true)
        .context("Failed to build the portal HTTP client")?;
    let fetcher = SlotFetcher::new(client, &portal.page_url)?;
    let query = SlotQuery {
        service_id: portal.service_id,
        location_id: portal.location_id,
        opening_hours_ids: portal.opening_hours_ids.clone(),
        date: Utc::now().date_naive(),
        token: portal.token.clone(),
    };
    let source = Arc::new(PortalSlotSource::new(fetcher, query));

    let notifier: Option<Arc<dyn Notifier>> = match (config.use_telegram, &config.telegram) {
        (true, Some(telegram)) => Some(Arc::new(TelegramNotifier::new(HTTP_CLIENT.clone(), telegram))),
        (true, None) => {
            warn!("use_telegram is set but [telegram] is missing, notifications disabled");
            None
        }
        (false, _) => None,
    };

    let monitor = &config.monitor;
    Ok(Some(Arc::new(SlotMonitor::new(
        source,
        notifier,
        HistoryStore::new(&monitor.history_file, monitor.history_limit),
        NotificationState::new(
            &monitor.notification_state_file,
            chrono::Duration::hours(monitor.negative_cooldown_hours),
        ),
        MonitorSettings::from_config(monitor, &portal.page_url),
    ))))
}

/// The `/api` router. Monitor routes are merged in when a monitor runs.
pub fn build_router(config: Arc<AppConfig>, monitor: Option<MonitorState>) -> Router {
    let mut router = Router::new()
        .route("/", get(|| async { "Welcome to the Terminwahl API!" }))
        .route("/health", get(health))
        .with_state(config);

    if let Some(state) = monitor {
        router = router.merge(terminwahl_monitor::routes(Arc::new(state)));
    }

    Router::new().nest("/api", router)
}
