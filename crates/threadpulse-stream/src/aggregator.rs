//! Sliding-window per-story engagement statistics.
//!
//! The [`Aggregator`] is a single-writer state machine: every scored comment
//! from every scorer is funnelled into one instance. It is not internally
//! synchronised; hosts that share it across threads must serialise access.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::clock::Clock;
use crate::types::{Category, ScoredComment};

/// Trailing window over which statistics are kept: one hour.
pub const WINDOW_MS: i64 = 3_600_000;

/// Comment arrival timestamps kept in ascending order.
///
/// Late arrivals are inserted at their sorted position, so pruning from the
/// front stays correct even when parallel producers deliver out of order.
#[derive(Debug, Clone, Default)]
pub struct TimestampWindow {
    stamps: VecDeque<i64>,
}

impl TimestampWindow {
    fn insert(&mut self, timestamp: i64) {
        // Common case: in-order arrival lands at the back.
        if self.stamps.back().is_none_or(|&last| last <= timestamp) {
            self.stamps.push_back(timestamp);
        } else {
            let idx = self.stamps.partition_point(|&t| t <= timestamp);
            self.stamps.insert(idx, timestamp);
        }
    }

    /// Drop every timestamp older than `threshold`. Returns how many were removed.
    fn prune(&mut self, threshold: i64) -> usize {
        let keep_from = self.stamps.partition_point(|&t| t < threshold);
        self.stamps.drain(..keep_from);
        keep_from
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    #[must_use]
    pub fn oldest(&self) -> Option<i64> {
        self.stamps.front().copied()
    }
}

/// Engagement statistics for one story inside the window.
#[derive(Debug, Clone)]
pub struct StoryStats {
    pub subreddit: String,
    pub story_id: String,
    pub story_url: String,
    pub story_title: String,
    /// Newest comment timestamp seen for this story.
    pub last_comment_timestamp: i64,
    all: TimestampWindow,
    positive: TimestampWindow,
    negative: TimestampWindow,
    /// Creation order; breaks ranking ties.
    seq: u64,
}

impl StoryStats {
    fn new(comment: &ScoredComment, seq: u64) -> Self {
        let record = &comment.record;
        Self {
            subreddit: record.subreddit.clone(),
            story_id: record.story_id.clone(),
            story_url: record.story_url.clone(),
            story_title: record.story_title.clone(),
            last_comment_timestamp: record.fetch_timestamp,
            all: TimestampWindow::default(),
            positive: TimestampWindow::default(),
            negative: TimestampWindow::default(),
            seq,
        }
    }

    fn add(&mut self, score: i32, timestamp: i64) {
        self.all.insert(timestamp);
        if score > 0 {
            self.positive.insert(timestamp);
        } else if score < 0 {
            self.negative.insert(timestamp);
        }
        self.last_comment_timestamp = self.last_comment_timestamp.max(timestamp);
    }

    fn prune(&mut self, threshold: i64) -> usize {
        self.all.prune(threshold) + self.positive.prune(threshold) + self.negative.prune(threshold)
    }

    #[must_use]
    pub fn timestamps(&self, category: Category) -> &TimestampWindow {
        match category {
            Category::All => &self.all,
            Category::Positive => &self.positive,
            Category::Negative => &self.negative,
        }
    }

    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.timestamps(category).len()
    }

    #[must_use]
    pub fn oldest(&self, category: Category) -> Option<i64> {
        self.timestamps(category).oldest()
    }

    #[must_use]
    pub fn all_count(&self) -> usize {
        self.all.len()
    }

    #[must_use]
    pub fn positive_count(&self) -> usize {
        self.positive.len()
    }

    #[must_use]
    pub fn negative_count(&self) -> usize {
        self.negative.len()
    }
}

/// Story table plus the window/eviction policy around it.
pub struct Aggregator {
    stories: HashMap<String, StoryStats>,
    clock: Arc<dyn Clock>,
    window_ms: i64,
    next_seq: u64,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field("stories", &self.stories.len())
            .field("window_ms", &self.window_ms)
            .finish_non_exhaustive()
    }
}

impl Aggregator {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_window(clock, WINDOW_MS)
    }

    #[must_use]
    pub fn with_window(clock: Arc<dyn Clock>, window_ms: i64) -> Self {
        Self {
            stories: HashMap::new(),
            clock,
            window_ms,
            next_seq: 0,
        }
    }

    /// Fold one scored comment into the table.
    ///
    /// 1. Look up or create the story; identity fields come from the first
    ///    comment seen and are never overwritten.
    /// 2. Append the timestamp to the `all` sequence and, for non-zero scores,
    ///    to the `positive` or `negative` sequence.
    /// 3. Drop timestamps older than `now - window` from the story's sequences.
    /// 4. Sweep the table: stories whose newest comment is older than the
    ///    window are removed; survivors have their sequences pruned too so
    ///    their counts never include stale comments.
    pub fn update(&mut self, comment: &ScoredComment) {
        let now = self.clock.now_millis();
        let threshold = now - self.window_ms;
        let record = &comment.record;

        let next_seq = &mut self.next_seq;
        let story = self
            .stories
            .entry(record.story_id.clone())
            .or_insert_with(|| {
                let seq = *next_seq;
                *next_seq += 1;
                StoryStats::new(comment, seq)
            });
        story.add(comment.sentiment_score, record.fetch_timestamp);

        let window_ms = self.window_ms;
        self.stories.retain(|_, story| {
            if now - story.last_comment_timestamp > window_ms {
                tracing::debug!(
                    story_id = %story.story_id,
                    story_url = %story.story_url,
                    "no comment received inside window; discarding story"
                );
                return false;
            }
            story.prune(threshold);
            true
        });
    }

    /// Up to `n` stories ranked by descending count in `category`.
    ///
    /// Ties are broken by the order in which stories first entered the table
    /// (earlier first), so repeated calls without an intervening update
    /// return the same sequence. `n == 0` yields an empty result.
    #[must_use]
    pub fn top_n(&self, category: Category, n: usize) -> Vec<&StoryStats> {
        if n == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<&StoryStats> = self.stories.values().collect();
        ranked.sort_by(|a, b| {
            b.count(category)
                .cmp(&a.count(category))
                .then(a.seq.cmp(&b.seq))
        });
        ranked.truncate(n);
        ranked
    }

    #[must_use]
    pub fn get(&self, story_id: &str) -> Option<&StoryStats> {
        self.stories.get(story_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
