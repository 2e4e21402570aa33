//! Subreddit comment feed (`/r/<name>/comments/.rss`, Atom).

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;

use super::{FeedEntry, FeedSource};
use crate::error::FeedError;

/// HTTP client for one subreddit's comment feed.
#[derive(Debug, Clone)]
pub struct RedditFeed {
    client: Client,
    subreddit: String,
    feed_url: String,
}

impl RedditFeed {
    /// Build a feed client for `subreddit` on `base_url`
    /// (e.g. `https://www.reddit.com`).
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        subreddit: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self::with_client(client, subreddit, base_url))
    }

    /// Build a feed client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, subreddit: &str, base_url: &str) -> Self {
        let encoded = utf8_percent_encode(subreddit, NON_ALPHANUMERIC);
        let feed_url = format!(
            "{}/r/{encoded}/comments/.rss",
            base_url.trim_end_matches('/')
        );
        Self {
            client,
            subreddit: subreddit.to_string(),
            feed_url,
        }
    }

    #[must_use]
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
}

impl FeedSource for RedditFeed {
    fn subreddit(&self) -> &str {
        &self.subreddit
    }

    async fn fetch(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let response = self.client.get(&self.feed_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.feed_url.clone(),
            });
        }

        let body = response.bytes().await?;
        let entries = parse_entries(&body)?;
        tracing::debug!(
            subreddit = %self.subreddit,
            count = entries.len(),
            "fetched comment feed"
        );
        Ok(entries)
    }
}

/// Parse an RSS/Atom document into [`FeedEntry`]s, preserving feed order.
///
/// # Errors
///
/// Returns [`FeedError::Parse`] if the document is not a recognisable feed.
pub(crate) fn parse_entries(body: &[u8]) -> Result<Vec<FeedEntry>, FeedError> {
    let feed = feed_rs::parser::parse(body)?;
    Ok(feed
        .entries
        .into_iter()
        .map(|entry| FeedEntry {
            id: entry.id,
            link: entry.links.into_iter().next().map(|l| l.href),
            title: entry.title.map(|t| t.content),
            author: entry.authors.into_iter().next().map(|p| p.name),
            content: entry.content.and_then(|c| c.body),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>newest submissions : rust</title>
  <id>/r/rust/comments/.rss</id>
  <updated>2024-05-01T12:00:00+00:00</updated>
  <entry>
    <author><name>/u/ferris</name><uri>https://www.reddit.com/user/ferris</uri></author>
    <content type="html">&lt;div class="md"&gt;&lt;p&gt;This is great!&lt;/p&gt;&lt;/div&gt;</content>
    <id>t1_kx9z0q1</id>
    <link href="https://www.reddit.com/r/rust/comments/1abcde/async_closures/kx9z0q1/"/>
    <updated>2024-05-01T11:59:00+00:00</updated>
    <title>/u/ferris on Async closures are stable</title>
  </entry>
  <entry>
    <author><name>/u/crab</name></author>
    <id>t1_noContent</id>
    <link href="https://www.reddit.com/r/rust/comments/1abcde/async_closures/noContent/"/>
    <updated>2024-05-01T11:58:00+00:00</updated>
    <title>/u/crab on Async closures are stable</title>
  </entry>
</feed>"#;

    #[test]
    fn parses_atom_entries_in_order() {
        let entries = parse_entries(SAMPLE_ATOM.as_bytes()).expect("valid Atom");
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.id, "t1_kx9z0q1");
        assert_eq!(
            first.link.as_deref(),
            Some("https://www.reddit.com/r/rust/comments/1abcde/async_closures/kx9z0q1/")
        );
        assert_eq!(
            first.title.as_deref(),
            Some("/u/ferris on Async closures are stable")
        );
        assert_eq!(first.author.as_deref(), Some("/u/ferris"));
        assert!(first
            .content
            .as_deref()
            .is_some_and(|c| c.contains("<p>This is great!</p>")));

        assert_eq!(entries[1].id, "t1_noContent");
        assert_eq!(entries[1].content, None);
    }

    #[test]
    fn garbage_body_is_a_parse_error() {
        let err = parse_entries(b"definitely not xml").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn feed_url_is_built_from_base_and_subreddit() {
        let feed = RedditFeed::with_client(Client::new(), "rust", "https://www.reddit.com/");
        assert_eq!(feed.feed_url(), "https://www.reddit.com/r/rust/comments/.rss");
        assert_eq!(feed.subreddit(), "rust");
    }
}
