use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use docseal_server::logging::setup_logging;
use docseal_server::{create_router, AppState, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "docseald", version, about = "DocSeal signing and verification server")]
struct Args {
    /// Path to a TOML config file (defaults to ./docseal.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // .env is optional
    let _ = dotenvy::dotenv();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let _log_guard = setup_logging(config.log_dir.as_deref())?;
    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        key_bits = config.signing.key_bits,
        resign_policy = config.signing.resign_policy.as_str(),
        pinning = config.pinata.is_some(),
        assistant = config.gemini.is_some(),
        "starting docseald"
    );

    let state = AppState::from_config(&config)?;
    let app = create_router(state, config.max_upload_bytes);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
