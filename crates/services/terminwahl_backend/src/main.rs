// --- File: crates/services/terminwahl_backend/src/main.rs ---
use std::sync::Arc;

use axum::Router;
use terminwahl_common::{logging, Context};
use terminwahl_config::{load_config, AppConfig};
use terminwahl_monitor::MonitorState;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod app;

async fn shutdown_signal(stop: Arc<watch::Sender<bool>>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for shutdown signal: {}", e);
    }
    info!("Shutdown requested");
    stop.send_replace(true);
}

async fn serve(config: Arc<AppConfig>) -> Result<(), Box<dyn std::error::Error>> {
    let monitor = app::build_monitor(&config)?;
    let (stop_tx, stop_rx) = watch::channel(false);
    let stop_tx = Arc::new(stop_tx);

    let monitor_task = monitor.clone().map(|monitor| {
        tokio::spawn(async move { monitor.run(stop_rx).await })
    });
    let monitor_state = monitor.map(|monitor| MonitorState {
        monitor,
        stop: Arc::clone(&stop_tx),
    });

    let mut router: Router = app::build_router(config.clone(), monitor_state);

    // Serve the form assets in dev mode
    if cfg!(debug_assertions) {
        info!("Running in development mode, serving static files from ../../dist");
        router = router.nest_service("/static", ServeDir::new("../../dist"));
    }
    let router = router.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(stop_tx))
        .await?;

    if let Some(task) = monitor_task {
        if let Err(e) = task.await {
            error!("Monitor task ended abnormally: {}", e);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = match load_config().and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let level = logging::parse_level(&config.logging.level);
    // Keeps the file writer flushing until main returns
    let _log_guard = match &config.logging.directory {
        Some(directory) => Some(logging::init_with_file(level, directory, "terminwahl.log")),
        None => {
            logging::init_with_level(level);
            None
        }
    };

    if let Err(e) = serve(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
