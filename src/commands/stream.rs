//! `bookfeed stream`

use super::request_client;
use crate::args::FeedKind;
use anyhow::bail;
use bookfeed_core::config::Config;
use bookfeed_core::stream::{FeedParameters, HttpFeedTransport, StreamConsumer, StreamStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run(
    config: &Config,
    token: Option<String>,
    feed: FeedKind,
    params: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let client = request_client(config, token)?;
    let (name, path) = match feed {
        FeedKind::Books => ("books", config.stream.books_path.as_str()),
        FeedKind::Search => ("search", config.stream.search_path.as_str()),
    };
    let transport = HttpFeedTransport::for_client(&client, path)?
        .with_connect_timeout(config.stream.connect_timeout);
    let consumer: StreamConsumer = StreamConsumer::new(Arc::new(transport)).with_name(name);

    let interrupted = CancellationToken::new();
    let interrupt_guard = interrupted.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt_guard.cancel();
        }
    });

    consumer.start(params.into_iter().collect::<FeedParameters>());

    let mut status_rx = consumer.subscribe();
    let mut printed = 0;
    loop {
        tokio::select! {
            _ = interrupted.cancelled(), if !interrupted.is_cancelled() => {
                warn!("interrupted, stopping feed");
                consumer.stop();
            }
            _ = status_rx.changed() => {}
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
        }

        let snapshot = consumer.snapshot();
        // A start frame resets the buffer
        if snapshot.items.len() < printed {
            printed = 0;
        }
        for item in &snapshot.items[printed..] {
            println!("{}", item);
        }
        printed = snapshot.items.len();

        if snapshot.status.is_active() {
            continue;
        }

        info!(
            status = %snapshot.status,
            items = snapshot.items.len(),
            progress = snapshot.progress_count,
            total = ?snapshot.total,
            "feed finished"
        );
        return match snapshot.status {
            StreamStatus::Error => bail!(
                "feed failed: {}",
                snapshot.error_message.unwrap_or_default()
            ),
            _ => Ok(()),
        };
    }
}
