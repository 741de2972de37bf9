// --- File: crates/terminwahl_monitor/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    get_history_handler, get_metrics_handler, get_metrics_json_handler, get_status_handler,
    post_check_handler, post_stop_handler, MonitorState,
};

/// Creates a router containing all routes for the slot monitor.
pub fn routes(state: Arc<MonitorState>) -> Router {
    Router::new()
        .route("/status", get(get_status_handler))
        .route("/history", get(get_history_handler))
        .route("/check", post(post_check_handler))
        .route("/stop", post(post_stop_handler))
        .route("/metrics", get(get_metrics_handler))
        .route("/metrics.json", get(get_metrics_json_handler))
        .with_state(state)
}
