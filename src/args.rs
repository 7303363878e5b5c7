//! CLI argument definitions using clap

use bookfeed_core::config::env_loader;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "bookfeed.toml";

#[derive(Parser)]
#[command(name = "bookfeed")]
#[command(about = "Drive catalog feeds, cached fetches and recommendation requests")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the configured base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = env_loader::TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Consume a live feed until it ends
    Stream {
        #[arg(value_enum)]
        feed: FeedKind,

        /// Feed parameter as key=value (repeatable)
        #[arg(long = "param", short = 'p', value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },

    /// GET a resource through the cache
    Fetch {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// Number of times to request it
        #[arg(long, default_value_t = 1)]
        repeat: u32,

        /// Confirm cached responses with the origin
        #[arg(long, conflicts_with = "no_cache")]
        revalidate: bool,

        /// Skip the cache entirely
        #[arg(long)]
        no_cache: bool,
    },

    /// Ask the recommendation service
    Recommend {
        /// Free-form prompt
        prompt: String,
    },

    /// Print the effective configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    Books,
    Search,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("q=red fox"),
            Ok(("q".to_string(), "red fox".to_string()))
        );
        assert_eq!(
            parse_key_value("filter=a=b"),
            Ok(("filter".to_string(), "a=b".to_string()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_stream_command_parses_params() {
        let cli = Cli::try_parse_from([
            "bookfeed", "stream", "search", "-p", "q=dune", "--param", "page=2",
        ])
        .unwrap();

        match cli.command {
            Commands::Stream { feed, params } => {
                assert_eq!(feed, FeedKind::Search);
                assert_eq!(params.len(), 2);
            }
            _ => panic!("expected stream command"),
        }
    }

    #[test]
    fn test_fetch_flags_conflict() {
        let result = Cli::try_parse_from([
            "bookfeed", "fetch", "/api/books", "--revalidate", "--no-cache",
        ]);
        assert!(result.is_err());
    }
}
