//! The `menumenu serve` command.

use crate::server::{self, AppState};
use clap::Args;
use menumenu_core::{Config, MenuMenu};
use std::net::{IpAddr, SocketAddr};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let host = match args.host {
        Some(host) => host,
        None => config.server.host.parse().map_err(|e| {
            anyhow::anyhow!("Invalid server.host '{}': {e}", config.server.host)
        })?,
    };
    let port = args.port.unwrap_or(config.server.port);

    let menu = MenuMenu::new(config)?;
    tracing::info!(
        "Vision provider: {}, primary image search: {}",
        menu.extractor().provider_name(),
        if menu.resolver().has_primary() { "google" } else { "none (unsplash only)" }
    );

    server::serve(SocketAddr::new(host, port), AppState { menu }).await
}
