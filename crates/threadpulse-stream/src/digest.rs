//! Human-readable digest of the current rankings.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::aggregator::Aggregator;
use crate::types::Category;

const RULE: &str = "=================================================================================";

/// Stories listed per section.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestEntry {
    pub title: String,
    pub url: String,
    pub count: usize,
    /// Minutes spanned by the counted comments, rounded up. `None` if the
    /// story has no comments in this category.
    pub span_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestSection {
    pub category: Category,
    pub entries: Vec<DigestEntry>,
}

/// Snapshot of the three rankings at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<DigestSection>,
}

impl Digest {
    /// Capture the top `top_n` stories of every category as of `now_millis`.
    #[must_use]
    pub fn build(aggregator: &Aggregator, top_n: usize, now_millis: i64) -> Self {
        let sections = Category::ALL
            .into_iter()
            .map(|category| DigestSection {
                category,
                entries: aggregator
                    .top_n(category, top_n)
                    .into_iter()
                    .map(|story| DigestEntry {
                        title: story.story_title.clone(),
                        url: story.story_url.clone(),
                        count: story.count(category),
                        span_minutes: story
                            .oldest(category)
                            .map(|oldest| minutes_since(oldest, now_millis)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            generated_at: DateTime::from_timestamp_millis(now_millis).unwrap_or_default(),
            sections,
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn minutes_since(oldest: i64, now: i64) -> i64 {
    let elapsed = (now - oldest).max(0);
    (elapsed + 59_999) / 60_000
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::new();
        write!(out, "\n\n{RULE}\n")?;
        write!(
            out,
            "{}\n\n",
            self.generated_at.format("%a %b %e %H:%M:%S UTC %Y")
        )?;

        for section in &self.sections {
            write!(out, "\n\n{}:\n\n", section.category.heading())?;
            for (idx, entry) in section.entries.iter().enumerate() {
                let suffix = entry
                    .span_minutes
                    .map(|m| format!(" in last {m} minutes"))
                    .unwrap_or_default();
                write!(
                    out,
                    "{}. {}\n\t{} comments{}\n\t{}\n\n",
                    idx + 1,
                    entry.title,
                    entry.count,
                    suffix,
                    entry.url
                )?;
            }
        }

        write!(out, "\n\n{RULE}\n")?;
        f.write_str(&out)
    }
}
