//! `SolarOps` Embed Server
//!
//! Issues embed links and resolves embed sessions for CRM-hosted iframes.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use solarops_embed::config::DEFAULT_TTL_MINUTES;
use solarops_embed::http::{AppState, build_router, cors_layer};
use solarops_embed::{EmbedConfig, EmbedService, EmbedTokenAuthority, JobDatabase};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "solarops_embed=info,tower_http=warn";

#[derive(Parser, Debug)]
#[command(name = "solarops-embed")]
#[command(version, about = "SolarOps embed server - signed links for CRM-embedded job panels")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "SOLAROPS_EMBED_ADDR", default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Path to `SQLite` job database file.
    #[arg(long, env = "SOLAROPS_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Secret used to sign embed tokens. Changing it invalidates every issued token.
    #[arg(long, env = "SOLAROPS_EMBED_SECRET", hide_env_values = true)]
    embed_secret: String,

    /// Embed token TTL in minutes.
    #[arg(long, env = "SOLAROPS_EMBED_TTL_MINUTES", default_value_t = DEFAULT_TTL_MINUTES)]
    embed_ttl_minutes: u32,

    /// Public base URL of the dashboard serving embed panels.
    #[arg(long, env = "SOLAROPS_DASHBOARD_URL")]
    dashboard_url: String,

    /// Origin allowed to call the embed API (repeatable). Any origin when unset.
    #[arg(long = "allowed-origin", env = "SOLAROPS_ALLOWED_ORIGINS", value_delimiter = ',')]
    allowed_origins: Vec<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.log_json);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %args.addr,
        "Starting solarops-embed"
    );

    let config = EmbedConfig::new(
        args.embed_secret.as_bytes(),
        args.embed_ttl_minutes,
        &args.dashboard_url,
    )
    .context("Invalid embed configuration")?;
    let authority = Arc::new(EmbedTokenAuthority::new(&config));
    info!(
        ttl_secs = authority.ttl_secs(),
        dashboard_url = %authority.base_url(),
        "Embed token authority ready"
    );

    let db_path = match args.db_path {
        Some(path) => path,
        None => default_db_path()?,
    };
    info!(path = %db_path.display(), "Opening job database");
    let db = JobDatabase::open(&db_path).await?;

    let origins = args
        .allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid origin: {o}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if origins.is_empty() {
        info!("CORS: allowing any origin");
    } else {
        info!(origins = ?args.allowed_origins, "CORS: restricted origins");
    }

    let service = EmbedService::new(authority, db);
    let app = build_router(AppState::new(service)).layer(cors_layer(origins));

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "Embed server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received shutdown signal");
        })
        .await?;

    info!("Embed server stopped");
    Ok(())
}

fn init_tracing(log_json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);
    if log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".solarops").join("jobs.db"))
}
