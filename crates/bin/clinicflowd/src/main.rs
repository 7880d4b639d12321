//! # clinicflowd — clinicflow daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Start the rule engine on its own bus subscription
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use clinicflow_adapter_http_axum::state::AppState;
use clinicflow_adapter_storage_sqlite_sqlx::{
    SqliteEventStore, SqliteNotificationRepository,
};
use clinicflow_app::action_log::TracingActionSink;
use clinicflow_app::event_bus::InProcessEventBus;
use clinicflow_app::rule_engine::RuleEngine;
use clinicflow_app::services::event_service::EventService;
use clinicflow_app::services::notification_service::NotificationService;
use clinicflow_domain::rule::catalog;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = clinicflow_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let event_store = SqliteEventStore::new(pool.clone());
    let notification_repo = SqliteNotificationRepository::new(pool);

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(config.events.bus_capacity));

    // Services
    let event_service = Arc::new(EventService::new(
        event_store,
        Arc::clone(&event_bus),
        config.events.retention,
    ));
    let notification_service = Arc::new(NotificationService::new(
        notification_repo,
        Arc::clone(&event_bus),
        config.notifications.capacity,
    ));

    // Rule engine
    let rules = catalog::builtin();
    let engine = RuleEngine::with_dedup_window(
        rules.clone(),
        TracingActionSink,
        Arc::clone(&notification_service),
        Arc::clone(&event_bus),
        config.events.dedup_window,
    );
    let engine_rx = event_bus.subscribe();
    let engine_task = tokio::spawn(async move { engine.run(engine_rx).await });
    tracing::info!(rules = rules.len(), "rule engine started");

    // HTTP
    let state = AppState::from_arcs(
        event_service,
        notification_service,
        rules.into(),
        Arc::clone(&event_bus),
    );
    let app = clinicflow_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "clinicflowd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    engine_task.abort();
    tracing::info!("clinicflowd stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
