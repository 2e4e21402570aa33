//! Additive lexicon scorer.

use threadpulse_core::Lexicon;

use crate::types::{CommentRecord, ScoredComment};

/// Sum the lexicon weights of every whitespace-separated token in `text`.
///
/// Unknown tokens contribute 0 and empty text scores 0. Text is expected to
/// be sanitized already (see [`crate::sanitize::clean`]); lookups ignore case.
#[must_use]
pub fn score(text: &str, lexicon: &Lexicon) -> i32 {
    text.split_whitespace()
        .filter_map(|token| lexicon.weight(token))
        .fold(0_i32, i32::saturating_add)
}

/// Attach a lexicon score to a comment record.
#[must_use]
pub fn score_comment(record: CommentRecord, lexicon: &Lexicon) -> ScoredComment {
    let sentiment_score = score(&record.text, lexicon);
    tracing::trace!(
        comment_id = %record.comment_id,
        story_id = %record.story_id,
        score = sentiment_score,
        "scored comment"
    );
    ScoredComment {
        record,
        sentiment_score,
    }
}
