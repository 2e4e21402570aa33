/// One comment pulled from a feed, ready for scoring.
///
/// Immutable once emitted by [`crate::FeedPoller`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub subreddit: String,
    pub story_id: String,
    pub story_url: String,
    pub story_title: String,
    pub comment_id: String,
    /// Sanitized, lower-cased, punctuation-free comment body.
    pub text: String,
    /// Milliseconds since the Unix epoch of the poll that produced this record.
    pub fetch_timestamp: i64,
}

/// A [`CommentRecord`] with its lexicon score attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredComment {
    pub record: CommentRecord,
    pub sentiment_score: i32,
}

/// Which per-story timestamp sequence a ranking is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Positive,
    Negative,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::All, Category::Positive, Category::Negative];

    /// Section heading used in the published digest.
    #[must_use]
    pub fn heading(self) -> &'static str {
        match self {
            Category::All => "MOST COMMENTED STORIES IN LAST 1 HOUR",
            Category::Positive => "MOST POSITIVE COMMENT STORIES IN LAST 1 HOUR",
            Category::Negative => "MOST NEGATIVE COMMENT STORIES IN LAST 1 HOUR",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::All => write!(f, "all"),
            Category::Positive => write!(f, "positive"),
            Category::Negative => write!(f, "negative"),
        }
    }
}
