//! `bookfeed recommend`

use super::request_client;
use bookfeed_core::config::Config;
use bookfeed_core::recommendations::RecommendationClient;
use std::sync::Arc;

pub async fn run(config: &Config, token: Option<String>, prompt: &str) -> anyhow::Result<()> {
    let client = Arc::new(request_client(config, token)?);
    let recommendations = RecommendationClient::new(client, &config.recommendations)
        .recommend(prompt)
        .await?;

    if recommendations.is_empty() {
        println!("No recommendations.");
    }
    for (rank, recommendation) in recommendations.iter().enumerate() {
        match &recommendation.author {
            Some(author) => println!("{}. {} by {}", rank + 1, recommendation.title, author),
            None => println!("{}. {}", rank + 1, recommendation.title),
        }
        if let Some(reason) = &recommendation.reason {
            println!("   {}", reason);
        }
    }
    Ok(())
}
