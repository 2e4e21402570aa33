//! `threadpulse run`: wire feeds, lexicon, and snapshot store into the pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use threadpulse_core::{AppConfig, Lexicon};
use threadpulse_stream::{
    run_pipeline, FeedPoller, FeedSource, FileStore, PipelineOptions, PollerOptions, RedditFeed,
    SystemClock, Url,
};
use tokio::sync::watch;

/// Resolve the subreddits to follow: CLI arguments win over the feeds file.
///
/// # Errors
///
/// Returns an error if the names are invalid or the feeds file cannot be loaded.
pub(crate) fn resolve_subreddits(
    cli_subreddits: &[String],
    feeds_path: &Path,
) -> anyhow::Result<Vec<String>> {
    if cli_subreddits.is_empty() {
        let file = threadpulse_core::load_feeds(feeds_path)
            .with_context(|| format!("loading feeds from {}", feeds_path.display()))?;
        return Ok(file.feeds.into_iter().map(|f| f.subreddit).collect());
    }

    let names: Vec<&str> = cli_subreddits.iter().map(String::as_str).collect();
    threadpulse_core::validate_subreddits(&names)?;
    Ok(cli_subreddits.to_vec())
}

/// Build one feed client per subreddit and keep those that answer a probe fetch.
async fn reachable_feeds(
    config: &AppConfig,
    subreddits: &[String],
) -> anyhow::Result<Vec<RedditFeed>> {
    let mut feeds = Vec::with_capacity(subreddits.len());
    for subreddit in subreddits {
        let feed = RedditFeed::new(
            subreddit,
            &config.feed_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        match feed.fetch().await {
            Ok(entries) => {
                tracing::info!(subreddit = %subreddit, entries = entries.len(), "feed reachable");
                feeds.push(feed);
            }
            Err(e) => {
                tracing::warn!(subreddit = %subreddit, error = %e, "skipping unreachable feed");
            }
        }
    }

    if feeds.is_empty() {
        anyhow::bail!("none of the {} configured feeds is reachable", subreddits.len());
    }
    Ok(feeds)
}

pub(crate) async fn run(config: &AppConfig, cli_subreddits: &[String]) -> anyhow::Result<()> {
    let lexicon = Lexicon::load(&config.lexicon_path)
        .with_context(|| format!("loading lexicon from {}", config.lexicon_path.display()))?;
    tracing::info!(entries = lexicon.len(), "lexicon loaded");

    let subreddits = resolve_subreddits(cli_subreddits, &config.feeds_path)?;
    let site = Url::parse(&config.feed_base_url)
        .with_context(|| format!("parsing feed base URL {}", config.feed_base_url))?;

    let pollers: Vec<_> = reachable_feeds(config, &subreddits)
        .await?
        .into_iter()
        .map(|feed| {
            FeedPoller::with_options(
                feed,
                PollerOptions {
                    record_malformed: config.record_malformed,
                    site: site.clone(),
                },
            )
        })
        .collect();

    let store = Arc::new(FileStore::new(&config.snapshot_path));
    let options = PipelineOptions {
        tick: Duration::from_millis(config.tick_ms),
        scorer_workers: config.scorer_workers,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        crate::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    tracing::info!(
        feeds = pollers.len(),
        snapshot = %config.snapshot_path.display(),
        "threadpulse running"
    );
    run_pipeline(
        pollers,
        Arc::new(lexicon),
        store,
        Arc::new(SystemClock),
        options,
        shutdown_rx,
    )
    .await?;

    tracing::info!("pipeline stopped");
    Ok(())
}
