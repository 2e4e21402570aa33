//! Streaming comment-sentiment engine.
//!
//! Polls subreddit comment feeds, drops comments already seen in recent polls,
//! scores each comment against a static lexicon, and keeps a one-hour sliding
//! window of per-story engagement that is ranked and periodically published
//! as a plain-text digest.

pub mod aggregator;
pub mod clock;
pub mod dedup;
pub mod digest;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod poller;
pub mod sanitize;
pub mod scorer;
pub mod sources;
pub mod store;
pub mod story;
pub mod types;

pub use aggregator::{Aggregator, StoryStats, WINDOW_MS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use dedup::DedupWindow;
pub use digest::Digest;
pub use error::{EntryError, FeedError, PipelineError, StoreError};
pub use gate::{PublishGate, PUBLISH_THROTTLE_MS};
pub use pipeline::{run_pipeline, PipelineOptions};
pub use poller::{FeedPoller, PollerOptions, POLL_INTERVAL_MS};
pub use scorer::{score, score_comment};
pub use sources::{FeedEntry, FeedSource, RedditFeed};
pub use store::{FileStore, MemoryStore, SnapshotStore};
pub use types::{Category, CommentRecord, ScoredComment};

pub use reqwest::Url;
