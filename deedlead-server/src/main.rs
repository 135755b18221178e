//! deedlead-server - tax deed lead tracker
//!
//! Serves the lead, call log, metrics and CSV import API over the SQLite
//! database in the root folder.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use deedlead_common::config::{resolve_root_folder, RootFolderInitializer, ServerSettings, TomlConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deedlead_server::api::buildinfo::BuildInfo;
use deedlead_server::{build_router, AppState};

/// Command-line arguments for deedlead-server
#[derive(Parser, Debug)]
#[command(name = "deedlead-server")]
#[command(about = "Tax deed lead tracking service")]
#[command(version)]
struct Args {
    /// Folder holding the database
    #[arg(short, long, env = "DEEDLEAD_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "DEEDLEAD_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DEEDLEAD_PORT")]
    port: Option<u16>,

    /// TOML config file
    #[arg(short, long, env = "DEEDLEAD_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let settings = ServerSettings::resolve(args.host.as_deref(), args.port, &toml_config);

    // RUST_LOG wins over the configured level
    let default_directive = format!(
        "deedlead_server={level},deedlead_common={level},tower_http={level}",
        level = settings.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let build = BuildInfo::current();
    info!(
        "Starting deedlead-server v{} [{}] built {} ({})",
        build.version, build.git_hash, build.build_timestamp, build.build_profile
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let db_path = initializer.database_path();
    let db = deedlead_common::db::init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!("Database: {}", db_path.display());

    let app = build_router(AppState::new(db, settings.max_upload_bytes));

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
