//! Command routing

use crate::args::{Cli, Commands};
use crate::commands;
use bookfeed_core::config::Config;

pub async fn route(cli: Cli, config: Config) -> anyhow::Result<()> {
    let token = cli.token;
    match cli.command {
        Commands::Stream { feed, params } => {
            commands::stream::run(&config, token, feed, params).await
        }
        Commands::Fetch {
            path,
            repeat,
            revalidate,
            no_cache,
        } => {
            let options = commands::fetch::FetchOptions {
                repeat,
                revalidate,
                no_cache,
            };
            commands::fetch::run(&config, token, &path, options).await
        }
        Commands::Recommend { prompt } => commands::recommend::run(&config, token, &prompt).await,
        Commands::Config => commands::config::show(&config),
    }
}
