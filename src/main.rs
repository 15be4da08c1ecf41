use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use compliance_api::platform::HttpClientFactory;
use compliance_api::{app, AppConfig, AppState};

#[derive(Debug, Parser)]
#[command(name = "compliance-api", version, about = "MFA, RLS and PITR checks over the platform APIs")]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Env file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env if present so cargo run picks up PLATFORM_URL and friends
    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path).with_context(|| format!("failed to load {}", path.display()))?;
        }
        None => {
            let _ = dotenvy::dotenv();
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("compliance_api=info,tower_http=info")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env().context("invalid configuration")?);
    if config.is_multi_project() {
        tracing::info!("Multi-project mode: {}", config.project_refs().join(", "));
    } else {
        tracing::info!("Single-project mode: {}", config.platform.url);
    }
    if config.management.bearer_token.is_none() {
        tracing::warn!("MANAGEMENT_API_BEARER_TOKEN is not set; /security/rls and /security/pitr will fail");
    }

    let clients = HttpClientFactory::new(config.clone()).context("failed to build HTTP client")?;
    let state = AppState::new(config.clone(), Arc::new(clients));

    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Compliance API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")
}
