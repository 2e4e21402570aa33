//! Feed source abstraction and the Reddit implementation.

mod reddit;

use std::future::Future;

pub use reddit::RedditFeed;

use crate::error::FeedError;

/// One raw entry of a comment feed, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Stable, unique comment identifier.
    pub id: String,
    pub link: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// Raw HTML body, if the entry carried one.
    pub content: Option<String>,
}

/// Something a [`crate::FeedPoller`] can pull entries from.
pub trait FeedSource: Send + Sync {
    /// Subreddit (or other label) this source covers.
    fn subreddit(&self) -> &str;

    /// Fetch the current entries, newest first as the feed provides them.
    fn fetch(&self) -> impl Future<Output = Result<Vec<FeedEntry>, FeedError>> + Send;
}
