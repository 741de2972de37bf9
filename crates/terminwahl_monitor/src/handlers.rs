// --- File: crates/terminwahl_monitor/src/handlers.rs ---
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use terminwahl_common::{handle_json_result, TerminError};
use terminwahl_form::validate::today_in_office_tz;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::checker::{CheckResult, MonitorStatus, SlotMonitor};
use crate::error::MonitorError;
use crate::history::AvailabilityRecord;
use crate::metrics::MetricsSnapshot;
use crate::range::parse_date;

/// Default number of records returned by the history route.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
pub struct MonitorState {
    pub monitor: Arc<SlotMonitor>,
    /// Stops the scheduled loop.
    pub stop: Arc<watch::Sender<bool>>,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    /// Only records checked on or after this day (`DD.MM.YYYY` or `YYYY-MM-DD`).
    pub since: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub records: Vec<AvailabilityRecord>,
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    /// False when the loop had already been asked to stop.
    pub stopping: bool,
}

pub async fn get_status_handler(State(state): State<Arc<MonitorState>>) -> Json<MonitorStatus> {
    Json(state.monitor.status().read().await.clone())
}

/// Newest records first.
pub async fn get_history_handler(
    State(state): State<Arc<MonitorState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, Response> {
    handle_json_result(load_history(&state, query).await)
}

async fn load_history(state: &MonitorState, query: HistoryQuery) -> Result<HistoryResponse, TerminError> {
    let since = match query.since.as_deref() {
        Some(value) => Some(
            parse_date(value).ok_or_else(|| MonitorError::InvalidDate(value.to_string()))?,
        ),
        None => None,
    };
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

    let mut records = state.monitor.history().load().await?;
    if let Some(since) = since {
        records.retain(|record| record.timestamp.date_naive() >= since);
    }
    let total = records.len();
    records.reverse();
    records.truncate(limit);
    debug!("Returning {} of {} history records", records.len(), total);

    Ok(HistoryResponse { total, records })
}

/// Runs a check right away, outside the schedule.
pub async fn post_check_handler(
    State(state): State<Arc<MonitorState>>,
) -> Result<Json<CheckResult>, Response> {
    info!("On-demand slot check requested");
    let result = state.monitor.run_check(today_in_office_tz()).await;
    handle_json_result(result.map_err(TerminError::from))
}

pub async fn post_stop_handler(State(state): State<Arc<MonitorState>>) -> Json<StopResponse> {
    let already = state.stop.send_replace(true);
    info!("Monitor stop requested");
    Json(StopResponse { stopping: !already })
}

pub async fn get_metrics_handler(State(state): State<Arc<MonitorState>>) -> Response {
    let body = state.monitor.metrics().snapshot().to_prometheus();
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body).into_response()
}

/// The same counters as JSON.
pub async fn get_metrics_json_handler(State(state): State<Arc<MonitorState>>) -> Json<MetricsSnapshot> {
    Json(state.monitor.metrics().snapshot())
}
