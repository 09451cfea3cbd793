use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use enchant::config::{Config, Settings};
use enchant::llm::ClientAccessor;
use enchant::port::find_available_port;
use enchant::relay::ChatRelay;
use enchant::server::{AppState, build_app};

#[derive(Parser)]
#[command(name = "enchant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the YAML config file (missing file means defaults)
    #[arg(short, long, default_value = "enchant.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the first port tried
    #[arg(short, long)]
    port: Option<u16>,

    /// Do not kill processes holding busy ports
    #[arg(long)]
    no_reclaim: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let settings = Settings::from_env().context("failed to load settings")?;
    info!(api_base = %settings.api_base, "Settings loaded");

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.no_reclaim {
        config.server.reclaim_busy_ports = false;
    }

    let port = find_available_port(
        &config.server.host,
        config.server.port_range(),
        config.server.reclaim_busy_ports,
    )
    .await?;

    let accessor = Arc::new(ClientAccessor::from_settings(&settings));
    let relay = ChatRelay::new(accessor, config.completion.clone());
    let state = AppState {
        relay: Arc::new(relay),
    };
    let app = build_app(state, &config.server, &config.cors);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.server.host, port))?;
    info!(addr = %listener.local_addr()?, "Starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down server..."),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
