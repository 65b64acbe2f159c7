//! HTTP server command for the contacts bridge

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use contactsync_server::config::CorsOrigins;
use contactsync_server::http::{run_server, ServerConfig};
use contactsync_server::{build_service, BridgeConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides CONTACTSYNC_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow any origin regardless of CORS_ORIGINS - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let bridge = BridgeConfig::from_env().context("Invalid bridge configuration")?;

    let config = ServerConfig {
        bind_addr: args.bind.unwrap_or(bridge.bind_addr),
        cors_origins: if args.cors_permissive {
            CorsOrigins::Any
        } else {
            bridge.cors_origins.clone()
        },
    };

    tracing::info!(
        primary = %format!("{}:{}/{}", bridge.primary.host, bridge.primary.port, bridge.primary.database),
        secondary = %format!("{}:{}/{}", bridge.secondary.host, bridge.secondary.port, bridge.secondary.database),
        timeout = ?bridge.pool.timeout,
        "Starting contactsync server on {}",
        config.bind_addr
    );

    // Pools connect lazily; neither store has to be up yet
    let service = build_service(&bridge);

    // Run server (blocks until shutdown)
    run_server(service, config).await.context("Server error")?;

    Ok(())
}
