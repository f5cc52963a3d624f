use anyhow::Context;
use axum::{extract::Request, ServiceExt};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rideau_canal_api::config::AppConfig;
use rideau_canal_api::database::{CosmosStore, MemoryStore, ReadingStore};
use rideau_canal_api::{app, AppState};

#[derive(Parser)]
#[command(name = "rideau-canal-api")]
#[command(about = "Rideau Canal monitoring dashboard backend")]
#[command(version)]
struct Args {
    #[arg(long, help = "Bind host (overrides HOST)")]
    host: Option<String>,

    #[arg(long, short, help = "Bind port (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Directory holding the dashboard's static files (overrides DASHBOARD_DIR)")]
    dashboard_dir: Option<PathBuf>,

    #[arg(long, help = "Serve readings from a JSON fixture file instead of the document store")]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up COSMOS_* settings
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.dashboard_dir {
        config.server.dashboard_dir = dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Rideau Canal API in {:?} mode", config.environment);

    let store: Arc<dyn ReadingStore> = match &args.fixture {
        Some(path) => {
            let store = MemoryStore::from_json_file(path)
                .await
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            tracing::info!(readings = store.len(), "Serving readings from fixture {}", path.display());
            Arc::new(store)
        }
        None => {
            for var in config.cosmos.missing() {
                tracing::warn!("{} is not set; store queries will fail until it is", var);
            }
            Arc::new(CosmosStore::new(config.cosmos.clone()))
        }
    };

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, store));
    tracing::info!(store = state.readings.store_name(), "Reading store ready");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Dashboard backend listening on http://{}", bind_addr);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
