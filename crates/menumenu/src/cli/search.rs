//! The `menumenu search` command: one image lookup.

use clap::Args;
use menumenu_core::{Config, ImageResolver};

/// Arguments for the `search` command.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Image search query, e.g. "Pad Thai street food plated"
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the search command.
///
/// Needs no vision provider, so only the resolver is built.
pub async fn execute(args: SearchArgs, config: Config) -> anyhow::Result<()> {
    let query = args.query.join(" ");
    let resolver = ImageResolver::from_config(&config);

    let result = resolver.resolve(&query).await?;
    if result.is_empty() {
        tracing::info!("No image found for '{query}'");
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{json}");
    Ok(())
}
