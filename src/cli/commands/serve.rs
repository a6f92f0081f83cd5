use anyhow::Context;
use clap::Args;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::app::{self, AppState};
use crate::config::{AppConfig, DEV_JWT_SECRET};
use crate::database;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs, mut config: AppConfig) -> anyhow::Result<()> {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Config refuses the development secret in every other environment
    if config.security.jwt_secret == DEV_JWT_SECRET {
        warn!("JWT_SECRET not set; using the development secret");
    }

    info!("Starting Webtoon API in {:?} mode", config.environment);

    let store = database::connect(&config.database)
        .await
        .context("failed to open webtoon store")?;
    let state = AppState::new(store.clone(), &config)?;
    let router = app::router(state, &config);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Server is running on http://{}", bind_addr);

    let served = app::serve(listener, router, shutdown_signal()).await;

    store.close().await;
    info!("Server stopped");

    served.context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
