use std::sync::Arc;

use anyhow::Context;
use clipserver::{
    build_router,
    tools::{ProcessTools, ToolAvailability},
    AppState, Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.download_dir).with_context(|| {
        format!("failed to create DOWNLOAD_DIR at {}", config.download_dir.display())
    })?;

    let availability = ToolAvailability::probe(&config.yt_dlp_path, &config.ffmpeg_path);
    if !availability.yt_dlp {
        tracing::warn!(
            path = %config.yt_dlp_path.display(),
            "yt-dlp not found; downloads will fail"
        );
    }
    if !availability.ffmpeg {
        tracing::warn!(
            path = %config.ffmpeg_path.display(),
            "ffmpeg not found; trimming will fail"
        );
    }

    let tools = Arc::new(ProcessTools::new(&config.yt_dlp_path, &config.ffmpeg_path));
    let addr = config.bind_addr();
    let base_url = config.base_url.clone();
    let state = AppState::new(config, tools, availability);
    let cleanup = state.cleanup.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    tracing::info!(%addr, "clipserver running at {base_url}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("clipserver failed")?;

    tracing::info!(pending = cleanup.pending(), "removing clips before exit");
    cleanup.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
