use thiserror::Error;

/// A failed poll. Recoverable: the poller state is left untouched and the
/// next tick retries.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Why a single feed entry was skipped. Never aborts the rest of the batch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry has no identifier")]
    MissingId,

    #[error("entry {comment_id} has no usable content")]
    MissingContent { comment_id: String },

    #[error("unexpected link structure \"{link}\": {reason}")]
    MalformedLink { link: String, reason: String },

    #[error("title \"{title}\" does not start with author prefix \"{prefix}\"")]
    MalformedTitle { title: String, prefix: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no feeds to poll")]
    NoFeeds,

    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
