// imagen-relay - Relay image prompts to Vertex AI Imagen
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use imagen_relay::cli::Args;
use imagen_relay::config::AppConfig;
use imagen_relay::oauth::ApplicationDefaultCredentials;
use imagen_relay::relay::ImageRelay;
use imagen_relay::server::create_router;
use imagen_relay::utils::logging;
use imagen_relay::vertex::VertexClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting imagen-relay v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Wire credentials and the prediction client
    let credentials = ApplicationDefaultCredentials::new(&config.credentials)?;
    let vertex_client = VertexClient::new(&config.vertex)?;
    info!(
        "Relaying to model {} in {} (project {})",
        config.vertex.model, config.vertex.location, config.vertex.project_id
    );
    let relay = ImageRelay::new(Arc::new(credentials), vertex_client);

    // Phase 4: Build and start HTTP server
    let app = create_router(&config.server, relay);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
