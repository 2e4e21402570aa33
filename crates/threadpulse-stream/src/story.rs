//! Extracting story identity from Reddit comment entries.
//!
//! A comment link has the shape
//! `/r/<subreddit>/comments/<story-id>/<story-slug>/<comment-id>/`, either
//! site-relative or absolute. The entry title is `"<author> on <story title>"`.

use reqwest::Url;

use crate::error::EntryError;

/// Story identity derived from a comment link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryRef {
    pub id: String,
    /// Absolute URL of the story thread (comment segment removed).
    pub url: String,
}

/// Resolve `link` against `site` and pull out the story id and thread URL.
///
/// # Errors
///
/// Returns [`EntryError::MalformedLink`] if the link cannot be resolved or
/// has no `comments/<id>` segment pair.
pub fn parse_story_link(link: &str, site: &Url) -> Result<StoryRef, EntryError> {
    let malformed = |reason: &str| EntryError::MalformedLink {
        link: link.to_string(),
        reason: reason.to_string(),
    };

    let url = site
        .join(link.trim())
        .map_err(|e| malformed(&e.to_string()))?;

    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(|| malformed("link has no path"))?
        .filter(|s| !s.is_empty())
        .collect();

    let pos = segments
        .iter()
        .position(|s| *s == "comments")
        .ok_or_else(|| malformed("missing \"comments\" segment"))?;
    let id = segments
        .get(pos + 1)
        .ok_or_else(|| malformed("missing story id after \"comments\""))?;

    // Keep up to and including the slug; drop the trailing comment id.
    let end = (pos + 3).min(segments.len());
    let mut story_url = url.clone();
    story_url.set_query(None);
    story_url.set_fragment(None);
    story_url.set_path(&format!("/{}/", segments[..end].join("/")));

    Ok(StoryRef {
        id: (*id).to_string(),
        url: story_url.to_string(),
    })
}

/// Remove the `"<author> on "` prefix from an entry title.
///
/// # Errors
///
/// Returns [`EntryError::MalformedTitle`] if the title does not start with
/// the prefix or nothing remains after it.
pub fn strip_author_prefix(title: &str, author: &str) -> Result<String, EntryError> {
    let prefix = format!("{author} on ");
    title
        .strip_prefix(&prefix)
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EntryError::MalformedTitle {
            title: title.to_string(),
            prefix,
        })
}
