//! Analysis Server
//!
//! Serves `POST /analyze` and `GET /health`, starting a fresh Stockfish
//! process for every analysis request.

use analysis_server::config::{resolve_engine_path, ServerConfig};
use analysis_server::AppState;
use anyhow::Context;
use chess_analysis::AnalysisService;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Analysis Server - Evaluates chess positions with Stockfish.
#[derive(Parser)]
#[command(name = "analysis-server")]
#[command(about = "Evaluates chess positions with Stockfish over HTTP")]
struct Args {
    /// Path to a TOML config file (default: ./analysis-server.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Path to the Stockfish executable
    #[arg(long)]
    stockfish: Option<PathBuf>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = self.stockfish {
            config.stockfish_path = Some(path);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = Args::parse();
    let mut config = ServerConfig::load(args.config.take().as_deref()).await?;
    config.apply_env(|name| std::env::var(name).ok())?;
    args.apply(&mut config);
    config.validate()?;

    let engine_path = resolve_engine_path(
        config.stockfish_path.as_deref(),
        std::env::var_os("PATH").as_deref(),
    );
    anyhow::ensure!(
        engine_path.is_file(),
        "Stockfish binary not found at {}",
        engine_path.display()
    );
    tracing::info!("Engine: {}", engine_path.display());

    let service = AnalysisService::new(config.engine_config(engine_path));
    let app = analysis_server::app(AppState::new(service, config.default_depth));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl+c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
