//! Heatscope - Heat Transfer Analysis Dashboard
//!
//! Predicts average/max/center block temperatures by nearest-neighbor
//! lookup against a reference dataset, derives an efficiency metric and
//! coolant/material suggestions, and serves the result over HTTP. Live
//! ambient/source readings can be pulled from a ThingSpeak-compatible
//! channel every refresh cycle.
//!
//! # Usage
//!
//! ```bash
//! # Run with the bundled sample dataset and default config
//! cargo run --release
//!
//! # Point at a local telemetry simulator
//! cargo run --bin telemetry-sim -- --addr 127.0.0.1:9100 &
//! HEATSCOPE_CONFIG=heatscope.toml cargo run --release
//!
//! # Run without any outbound telemetry calls
//! cargo run --release -- --no-telemetry
//! ```
//!
//! # Environment Variables
//!
//! - `HEATSCOPE_CONFIG`: Path to a TOML config file
//! - `HEATSCOPE_CORS_ORIGINS`: Extra allowed CORS origins (dev only)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use axum::Router;
use heatscope::api::{create_app, DashboardState};
use heatscope::config::AppConfig;
use heatscope::dataset::ReferenceDataset;
use heatscope::pipeline::{AppState, RefreshLoop};
use heatscope::telemetry::{ChannelClient, ReadingProvider};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "heatscope")]
#[command(about = "Heat Transfer Analysis Dashboard")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (overrides HEATSCOPE_CONFIG)
    #[arg(long)]
    config: Option<String>,

    /// Path to the reference dataset CSV
    #[arg(long)]
    dataset: Option<String>,

    /// Disable live telemetry fetching; run on manual defaults only
    #[arg(long)]
    no_telemetry: bool,

    /// Override the refresh cycle period in seconds
    #[arg(long)]
    refresh_secs: Option<u64>,
}

/// Named background tasks for shutdown reporting.
#[derive(Debug)]
enum TaskName {
    HttpServer,
    RefreshLoop,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpServer => write!(f, "HttpServer"),
            Self::RefreshLoop => write!(f, "RefreshLoop"),
        }
    }
}

// ============================================================================
// Startup
// ============================================================================

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(std::path::Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => AppConfig::load(),
    };

    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    if let Some(path) = &args.dataset {
        config.dataset.path = path.into();
    }
    if args.no_telemetry {
        config.telemetry.enabled = false;
    }
    if let Some(secs) = args.refresh_secs {
        config.telemetry.refresh_secs = secs;
    }

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            error!("Config error: {}", issue);
        }
        anyhow::bail!("Configuration is invalid ({} problem(s))", issues.len());
    }

    Ok(config)
}

fn spawn_http_server(
    task_set: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: Router,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[HttpServer] Task starting");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                info!("[HttpServer] Received shutdown signal");
            })
            .await;

        match result {
            Ok(()) => {
                info!("[HttpServer] Graceful shutdown complete");
                Ok(TaskName::HttpServer)
            }
            Err(e) => {
                error!("[HttpServer] Server error: {}", e);
                Err(anyhow::anyhow!("HTTP server error: {}", e))
            }
        }
    });
}

fn spawn_refresh_loop(
    task_set: &mut JoinSet<Result<TaskName>>,
    refresh: RefreshLoop,
) {
    task_set.spawn(async move {
        refresh.run().await;
        Ok(TaskName::RefreshLoop)
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = CliArgs::parse();
    let config = Arc::new(load_config(&args)?);

    info!("Heatscope starting");

    // Dataset load is fatal: without it no prediction can be answered.
    let dataset = ReferenceDataset::load(&config.dataset.path).with_context(|| {
        format!(
            "Failed to load reference dataset from {}",
            config.dataset.path.display()
        )
    })?;
    let dataset = Arc::new(dataset);

    let provider: Option<Box<dyn ReadingProvider>> = if config.telemetry.enabled {
        if config.telemetry.channel_id.is_empty() {
            warn!("Telemetry enabled but no channel_id configured; running on manual defaults");
            None
        } else {
            info!(
                channel = %config.telemetry.channel_id,
                refresh_secs = config.telemetry.refresh_secs,
                "Live telemetry enabled"
            );
            Some(Box::new(ChannelClient::new(&config.telemetry)))
        }
    } else {
        info!("Live telemetry disabled; running on manual defaults");
        None
    };

    let app_state = Arc::new(RwLock::new(AppState::default()));
    let dashboard_state = DashboardState::new(
        Arc::clone(&config),
        Arc::clone(&dataset),
        Arc::clone(&app_state),
    );
    let app = create_app(dashboard_state);

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;
    info!("HTTP server listening on {}", config.server.addr);
    info!("Dashboard available at: http://{}", config.server.addr);

    let cancel_token = CancellationToken::new();
    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();

    spawn_refresh_loop(
        &mut task_set,
        RefreshLoop::new(
            Arc::clone(&config),
            dataset,
            provider,
            app_state,
            cancel_token.clone(),
        ),
    );
    spawn_http_server(&mut task_set, listener, app, cancel_token.clone());

    // Wait for ctrl-c or the first task to exit.
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received ctrl-c, shutting down");
        }
        Some(result) = task_set.join_next() => {
            match result {
                Ok(Ok(name)) => warn!("Task {} exited unexpectedly", name),
                Ok(Err(e)) => error!("Task failed: {}", e),
                Err(e) => error!("Task panicked: {}", e),
            }
        }
    }

    cancel_token.cancel();
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(name)) => info!("Task {} stopped", name),
            Ok(Err(e)) => error!("Task failed during shutdown: {}", e),
            Err(e) => error!("Task panicked during shutdown: {}", e),
        }
    }

    info!("Shutdown complete");
    Ok(())
}
