//! Telemetry Channel Simulator
//!
//! Serves a ThingSpeak-compatible `feeds/last.json` endpoint with
//! jittered ambient/source temperature readings, for running the
//! dashboard end-to-end without a real sensor channel.
//!
//! # Usage
//! ```bash
//! ./telemetry-sim --addr 127.0.0.1:9100 --ambient 24 --source 62
//! # then point heatscope at it:
//! #   [telemetry]
//! #   base_url = "http://127.0.0.1:9100"
//! #   channel_id = "1"
//! ```

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use clap::Parser;
use rand::Rng;
use tracing::info;

/// Baseline ambient temperature (°C)
const DEFAULT_AMBIENT: f64 = 24.0;
/// Baseline source temperature (°C)
const DEFAULT_SOURCE: f64 = 62.0;
/// Jitter half-width applied to each reading (°C)
const JITTER: f64 = 1.5;

#[derive(Parser, Debug)]
#[command(name = "telemetry-sim")]
#[command(about = "Simulated telemetry channel for heatscope testing")]
#[command(version)]
struct Args {
    /// Bind address
    #[arg(long, default_value = "127.0.0.1:9100")]
    addr: String,

    /// Baseline ambient temperature (°C, field1)
    #[arg(long, default_value_t = DEFAULT_AMBIENT)]
    ambient: f64,

    /// Baseline source temperature (°C, field2)
    #[arg(long, default_value_t = DEFAULT_SOURCE)]
    source: f64,

    /// Report every Nth ambient reading as missing, to exercise fallback
    #[arg(long)]
    dropout: Option<u64>,
}

#[derive(Clone)]
struct SimState {
    ambient: f64,
    source: f64,
    dropout: Option<u64>,
    requests: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

/// GET /channels/:id/feeds/last.json — latest simulated reading.
///
/// Values are emitted as numeric strings, matching what the real
/// channel API returns.
async fn last_feed(
    Path(channel_id): Path<String>,
    State(state): State<SimState>,
) -> Json<serde_json::Value> {
    let n = state
        .requests
        .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        + 1;

    let mut rng = rand::thread_rng();
    let ambient = state.ambient + rng.gen_range(-JITTER..JITTER);
    let source = state.source + rng.gen_range(-JITTER..JITTER);

    let drop_ambient = state.dropout.is_some_and(|every| n % every == 0);
    let field1 = if drop_ambient {
        serde_json::Value::Null
    } else {
        serde_json::Value::String(format!("{ambient:.2}"))
    };

    Json(serde_json::json!({
        "channel_id": channel_id,
        "created_at": Utc::now().to_rfc3339(),
        "entry_id": n,
        "field1": field1,
        "field2": format!("{source:.2}"),
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let state = SimState {
        ambient: args.ambient,
        source: args.source,
        dropout: args.dropout,
        requests: std::sync::Arc::new(std::sync::atomic::AtomicU64::new(0)),
    };

    let app = Router::new()
        .route("/channels/:id/feeds/last.json", get(last_feed))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&args.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", args.addr))?;
    info!(
        addr = %args.addr,
        ambient = args.ambient,
        source = args.source,
        "Telemetry simulator listening"
    );

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
