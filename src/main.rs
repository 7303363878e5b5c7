//! Bookfeed CLI
//!
//! Manual driver for the bookfeed client pipeline.
//!
//! ```bash
//! bookfeed stream books --param genre=fantasy
//! bookfeed stream search --param q=dune
//! bookfeed fetch /api/books/42 --repeat 3
//! bookfeed recommend "cozy mysteries set in Scotland"
//! bookfeed config
//! ```
//!
//! Settings come from `bookfeed.toml` (or the file given with `--config`)
//! and `BOOKFEED_*` environment variables.

mod args;
mod commands;
mod router;

use args::Cli;
use bookfeed_core::config::{Config, ConfigLoader, LogFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::new()
        .with_defaults()
        .with_file(&cli.config)
        .with_env()
        .load()?;
    if let Some(base_url) = &cli.base_url {
        config.client.base_url = base_url.clone();
    }

    init_logging(&config, cli.verbose);
    router::route(cli, config).await
}

/// `RUST_LOG` wins over the configured level; `--verbose` forces debug
fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
