//! Per-feed polling with duplicate suppression.

use std::sync::LazyLock;

use reqwest::Url;

use crate::dedup::DedupWindow;
use crate::error::{EntryError, FeedError};
use crate::sanitize;
use crate::sources::{FeedEntry, FeedSource};
use crate::story::{parse_story_link, strip_author_prefix};
use crate::types::CommentRecord;

/// Minimum spacing between two fetches of the same feed.
pub const POLL_INTERVAL_MS: i64 = 30_000;

static DEFAULT_SITE: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://www.reddit.com").expect("default site URL is valid")
});

#[derive(Debug, Clone)]
pub struct PollerOptions {
    /// Remember entries that were skipped as unusable so later polls don't
    /// re-examine them. Off by default: such entries are not recorded.
    pub record_malformed: bool,
    /// Base used to resolve site-relative entry links.
    pub site: Url,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            record_malformed: false,
            site: DEFAULT_SITE.clone(),
        }
    }
}

/// Cooperative poller for one feed.
///
/// Every [`tick`](Self::tick) is cheap when the poll interval has not elapsed,
/// so an external scheduler may call it as often as it likes.
#[derive(Debug)]
pub struct FeedPoller<S> {
    source: S,
    history: DedupWindow,
    last_fetch: Option<i64>,
    options: PollerOptions,
}

impl<S: FeedSource> FeedPoller<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, PollerOptions::default())
    }

    pub fn with_options(source: S, options: PollerOptions) -> Self {
        Self {
            source,
            history: DedupWindow::new(),
            last_fetch: None,
            options,
        }
    }

    pub fn subreddit(&self) -> &str {
        self.source.subreddit()
    }

    /// Poll the feed if at least [`POLL_INTERVAL_MS`] passed since the last
    /// successful fetch, returning the comments not seen in recent polls.
    ///
    /// A throttled tick returns an empty vector without touching the source.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the fetch fails. Nothing is mutated in that
    /// case, so the next tick simply tries again.
    pub async fn tick(&mut self, now: i64) -> Result<Vec<CommentRecord>, FeedError> {
        if let Some(last) = self.last_fetch {
            if now - last < POLL_INTERVAL_MS {
                return Ok(Vec::new());
            }
        }

        let subreddit = self.source.subreddit().to_string();
        tracing::info!(subreddit = %subreddit, at = now, "fetching comments");
        let entries = self.source.fetch().await?;

        self.last_fetch = Some(now);
        self.history.start_batch();

        let fetched = entries.len();
        let mut records = Vec::with_capacity(fetched);
        for entry in entries {
            if !entry.id.is_empty() && self.history.seen(&entry.id) {
                tracing::debug!(subreddit = %subreddit, comment_id = %entry.id, "skip duplicate");
                continue;
            }

            match to_record(&entry, &subreddit, now, &self.options.site) {
                Ok(record) => {
                    self.history.record(&record.comment_id);
                    records.push(record);
                }
                Err(EntryError::MissingId) => {
                    tracing::debug!(subreddit = %subreddit, "skip entry without id");
                }
                Err(reason) => {
                    tracing::debug!(subreddit = %subreddit, comment_id = %entry.id, %reason, "skip entry");
                    if self.options.record_malformed {
                        self.history.record(&entry.id);
                    }
                }
            }
        }

        tracing::info!(
            subreddit = %subreddit,
            fetched,
            emitted = records.len(),
            "poll complete"
        );
        Ok(records)
    }
}

fn to_record(
    entry: &FeedEntry,
    subreddit: &str,
    now: i64,
    site: &Url,
) -> Result<CommentRecord, EntryError> {
    if entry.id.is_empty() {
        return Err(EntryError::MissingId);
    }

    let raw = entry
        .content
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| EntryError::MissingContent {
            comment_id: entry.id.clone(),
        })?;

    let story = parse_story_link(entry.link.as_deref().unwrap_or_default(), site)?;
    let title = entry.title.as_deref().unwrap_or_default();
    let story_title = strip_author_prefix(title, entry.author.as_deref().unwrap_or_default())?;

    Ok(CommentRecord {
        subreddit: subreddit.to_string(),
        story_id: story.id,
        story_url: story.url,
        story_title,
        comment_id: entry.id.clone(),
        text: sanitize::clean(raw),
        fetch_timestamp: now,
    })
}

#[cfg(test)]
#[path = "poller_test.rs"]
mod tests;
