//! tokio wiring: pollers → scorers → single summarizer.
//!
//! Pollers and scorers run as independent tasks. Every scored comment is
//! funnelled into one summarizer task that owns the [`Aggregator`] and the
//! [`PublishGate`], so neither needs a lock.

use std::sync::Arc;
use std::time::Duration;

use threadpulse_core::Lexicon;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::aggregator::Aggregator;
use crate::clock::Clock;
use crate::error::PipelineError;
use crate::gate::PublishGate;
use crate::poller::FeedPoller;
use crate::scorer::score_comment;
use crate::sources::FeedSource;
use crate::store::SnapshotStore;
use crate::types::{CommentRecord, ScoredComment};

const CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// How often each poller's `tick` is invoked.
    pub tick: Duration,
    /// Number of parallel scorer tasks.
    pub scorer_workers: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            scorer_workers: 2,
        }
    }
}

/// Run the streaming topology until `shutdown` flips to `true`.
///
/// Pollers stop first; scorers and the summarizer then drain whatever is
/// still queued and exit once their input channels close.
///
/// # Errors
///
/// Returns [`PipelineError::NoFeeds`] if `pollers` is empty, or
/// [`PipelineError::Task`] if a task panicked.
pub async fn run_pipeline<S, P>(
    pollers: Vec<FeedPoller<S>>,
    lexicon: Arc<Lexicon>,
    store: Arc<P>,
    clock: Arc<dyn Clock>,
    options: PipelineOptions,
    shutdown: watch::Receiver<bool>,
) -> Result<(), PipelineError>
where
    S: FeedSource + 'static,
    P: SnapshotStore + 'static,
{
    if pollers.is_empty() {
        return Err(PipelineError::NoFeeds);
    }

    let (record_tx, record_rx) = mpsc::channel::<CommentRecord>(CHANNEL_CAPACITY);
    let (scored_tx, scored_rx) = mpsc::channel::<ScoredComment>(CHANNEL_CAPACITY);
    let mut tasks = JoinSet::new();

    tracing::info!(
        feeds = pollers.len(),
        scorer_workers = options.scorer_workers,
        "starting pipeline"
    );

    for poller in pollers {
        tasks.spawn(poll_loop(
            poller,
            record_tx.clone(),
            Arc::clone(&clock),
            options.tick,
            shutdown.clone(),
        ));
    }
    drop(record_tx);

    let record_rx = Arc::new(Mutex::new(record_rx));
    for worker in 0..options.scorer_workers.max(1) {
        tasks.spawn(score_loop(
            worker,
            Arc::clone(&record_rx),
            scored_tx.clone(),
            Arc::clone(&lexicon),
        ));
    }
    drop(scored_tx);

    tasks.spawn(summarize_loop(scored_rx, store, clock));

    while let Some(joined) = tasks.join_next().await {
        joined?;
    }

    tracing::info!("pipeline stopped");
    Ok(())
}

async fn poll_loop<S: FeedSource>(
    mut poller: FeedPoller<S>,
    tx: mpsc::Sender<CommentRecord>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }

        // Dropping an in-flight tick is safe: nothing is mutated until the fetch returns.
        let result = tokio::select! {
            result = poller.tick(clock.now_millis()) => result,
            _ = shutdown.changed() => break,
        };

        match result {
            Ok(records) => {
                for record in records {
                    if tx.send(record).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    subreddit = %poller.subreddit(),
                    error = %e,
                    "feed fetch failed; retrying on next tick"
                );
            }
        }
    }

    tracing::debug!(subreddit = %poller.subreddit(), "poller stopped");
}

async fn score_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<CommentRecord>>>,
    tx: mpsc::Sender<ScoredComment>,
    lexicon: Arc<Lexicon>,
) {
    loop {
        // Holding the lock while waiting hands records out one at a time.
        let next = rx.lock().await.recv().await;
        let Some(record) = next else { break };
        if tx.send(score_comment(record, &lexicon)).await.is_err() {
            break;
        }
    }
    tracing::debug!(worker, "scorer stopped");
}

async fn summarize_loop<P: SnapshotStore>(
    mut rx: mpsc::Receiver<ScoredComment>,
    store: Arc<P>,
    clock: Arc<dyn Clock>,
) {
    let mut aggregator = Aggregator::new(Arc::clone(&clock));
    let mut gate = PublishGate::new(clock);

    while let Some(comment) = rx.recv().await {
        tracing::debug!(
            subreddit = %comment.record.subreddit,
            story_id = %comment.record.story_id,
            comment_id = %comment.record.comment_id,
            score = comment.sentiment_score,
            "received scored comment"
        );
        aggregator.update(&comment);

        if let Err(e) = gate.on_update(&aggregator, store.as_ref()).await {
            tracing::error!(error = %e, "failed to publish digest");
        }
    }

    tracing::debug!(stories = aggregator.len(), "summarizer stopped");
}
