// ABOUTME: Server binary for the macro tracker HTTP API
// ABOUTME: Loads configuration, opens the database, wires the USDA client and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Macro Tracker Server Binary
//!
//! Starts the HTTP API with a `SQLite` database and, when an API key is
//! configured, USDA `FoodData` Central lookups.

use anyhow::{Context, Result};
use clap::Parser;
use macro_tracker::{
    config::{environment::ServerConfig, DatabaseUrl},
    database::Database,
    external::{FoodDataSource, UsdaClient},
    logging,
    resources::ServerResources,
    routes::build_router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "macro-tracker-server")]
#[command(about = "Macro Tracker - nutrition tracking API with USDA food lookup")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (e.g. `sqlite:./data/macro_tracker.db`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;

    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database.url =
            DatabaseUrl::parse_url(&database_url).context("Invalid --database-url")?;
    }

    // Initialize production logging
    logging::init_from_env().context("Failed to initialize logging")?;

    info!("Starting Macro Tracker API");
    info!("{}", config.summary());

    if let DatabaseUrl::SQLite { path } = &config.database.url {
        ensure_parent_dir(path)?;
    }

    let database = Database::new(
        &config.database.url.to_connection_string(),
        config.database.max_connections,
    )
    .await
    .context("Failed to open database")?;

    if database.ensure_user(config.default_user_id).await? {
        info!(user.id = %config.default_user_id, "Created default user");
    }

    let food_source: Option<Arc<dyn FoodDataSource>> =
        config.food_api.client_config().map(|client_config| {
            info!(base_url = %client_config.base_url, "USDA food lookup enabled");
            Arc::new(UsdaClient::new(client_config)) as Arc<dyn FoodDataSource>
        });
    if food_source.is_none() {
        warn!("USDA food lookup disabled; food routes will answer 503");
    }

    let config = Arc::new(config);
    let resources = Arc::new(ServerResources::new(
        database.clone(),
        food_source,
        Arc::clone(&config),
    ));
    let app = build_router(resources);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    database.close().await;
    served.context("HTTP server error")?;

    info!("Macro Tracker API stopped");
    Ok(())
}

/// Create the directory holding the database file
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
