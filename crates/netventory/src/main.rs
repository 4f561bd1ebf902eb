//! netventory daemon
//!
//! Network device inventory service: axum HTTP API in front of a kameo
//! actor that owns the ingestion engine.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use kameo::actor::Spawn;
use netventory_core::{InventoryActor, InventoryActorArgs};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod api;
mod config;
mod factory;
mod router;
mod state;

use crate::config::Config;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "netventory")]
#[command(about = "Network device inventory daemon", long_about = None)]
struct Args {
    /// Config file (defaults to the standard search path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(bind) = args.bind {
        config.daemon.bind = bind;
    }

    init_tracing(&config.daemon.log_level, args.json);
    info!(version = env!("CARGO_PKG_VERSION"), "netventory daemon starting");

    let ingestor = factory::build_ingestor(&config).await?;
    let inventory = InventoryActor::spawn(InventoryActorArgs { ingestor });

    let bind = config.daemon.bind.clone();
    let state = Arc::new(AppState::new(inventory.clone(), config));
    let app = router::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    info!(addr = %bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    inventory.stop_gracefully().await.ok();
    info!("netventory daemon stopped");
    Ok(())
}
