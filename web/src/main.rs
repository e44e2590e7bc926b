//! Race admin server.
//!
//! Serves the `/admin` API for the race demo on one Raspberry Pi style host.
//!
//! This binary:
//! - Loads `.env` and reads [`Config`] from the environment
//! - Seeds missing race state files under the state directory
//! - Reads the demo zone this host runs
//! - Wires the file store and HTTP clients into a [`RaceController`]
//! - Serves until SIGINT or SIGTERM, then drains in-flight requests
//!
//! # Usage
//!
//! ```bash
//! EVENTSERVER=http://events.local DBZONE=http://directory.local \
//! ADMIN_PASSWORD_HASH='sha256$salt$...' cargo run --bin race-admin
//! ```

use anyhow::Context as _;
use race_admin_clients::{DirectoryClient, EventClient, IotSyncClient};
use race_admin_core::{
    RaceController, RaceEnvironment, RaceStateStore, StateStore, SystemClock,
};
use race_admin_store::FileStateStore;
use race_admin_web::{build_router, AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "race_admin=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(
        listen = %config.listen_addr,
        state_dir = %config.state_dir.display(),
        event_server = %config.event_server,
        directory = %config.directory_url,
        cars = config.cars.len(),
        "Configuration loaded"
    );

    let store = FileStateStore::new(&config.state_dir);
    store
        .initialize(&config.cars)
        .await
        .context("initializing race state")?;
    let store: Arc<dyn StateStore> = Arc::new(store);
    let zone = RaceStateStore::new(Arc::clone(&store), config.cars.clone())
        .demo_zone()
        .await
        .context("reading demo zone")?;
    tracing::info!(zone = %zone, "Demo zone loaded");

    let schedule = DirectoryClient::new(&config.directory_url, config.schedule_timeout)?;
    let iot_sync = IotSyncClient::new(
        DirectoryClient::new(&config.directory_url, config.iot_timeout)?,
        config.iot_timeout,
    )?;
    let notifier = EventClient::new(&config.event_server, config.event_timeout)?;

    let env = RaceEnvironment {
        store,
        schedule: Arc::new(schedule),
        notifier: Arc::new(notifier),
        iot_sync: Arc::new(iot_sync),
        clock: Arc::new(SystemClock),
    };
    let controller = RaceController::new(zone, config.cars.clone(), env);

    let app = build_router(AppState::new(controller), config.credentials.clone());
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "Race admin listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving admin API")?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
