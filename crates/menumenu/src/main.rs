//! MenuMenu CLI - photograph a menu, see the food.
//!
//! Runs the HTTP API the browser client talks to, and exposes the same
//! analysis and image lookup as local commands.
//!
//! # Usage
//!
//! ```bash
//! # Serve the API on the configured host and port
//! menumenu serve
//!
//! # Analyze a local menu photo and find dish images
//! menumenu scan menu.jpg --language German --format jsonl
//!
//! # Look up a single dish image
//! menumenu search "Pulpo a la gallega tapas plated professional photography"
//!
//! # View configuration
//! menumenu config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use cli::config::{ConfigArgs, ConfigCommand};
use menumenu_core::Config;
use std::path::{Path, PathBuf};

mod cli;
mod logging;
mod server;

/// MenuMenu - translated menus with a photo for every dish.
#[derive(Parser, Debug)]
#[command(name = "menumenu")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "MENUMENU_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve(cli::serve::ServeArgs),

    /// Analyze a menu photo and look up an image for every dish
    Scan(cli::scan::ScanArgs),

    /// Look up one dish image
    Search(cli::search::SearchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = config_path(&cli);
    let config = load_config(&cli, &config_path)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("MenuMenu v{}", menumenu_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Search(args) => cli::search::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, &config_path).await,
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    match &cli.config {
        Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
        None => Config::default_path(),
    }
}

/// `config init` and `config path` never read the file, so they must work
/// before it exists.
fn reads_config(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Config(ConfigArgs {
            command: ConfigCommand::Init { .. } | ConfigCommand::Path,
        })
    )
}

fn load_config(cli: &Cli, path: &Path) -> anyhow::Result<Config> {
    let explicit = cli.config.is_some();
    if explicit && reads_config(&cli.command) {
        // An explicitly named file must load
        return Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    let loaded = if explicit && !path.exists() {
        Ok(Config::default())
    } else if explicit {
        Config::load_from(path)
    } else {
        Config::load()
    };

    // Logging isn't initialized yet, so use eprintln for config warnings.
    match loaded {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. \
                 Check your config file with `menumenu config path`."
            );
            Ok(Config::default())
        }
    }
}
