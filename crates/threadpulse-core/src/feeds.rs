use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub subreddit: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedConfig>,
}

/// Load and validate the feed list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let feeds_file: FeedsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::FeedsFileParse)?;

    let names: Vec<&str> = feeds_file
        .feeds
        .iter()
        .map(|f| f.subreddit.as_str())
        .collect();
    validate_subreddits(&names)?;

    Ok(feeds_file)
}

/// Check subreddit names for emptiness, charset, and case-insensitive duplicates.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] describing the first offending name.
pub fn validate_subreddits(names: &[&str]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::Validation(
            "at least one subreddit is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "subreddit name must be non-empty".to_string(),
            ));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::Validation(format!(
                "subreddit '{name}' contains characters outside [A-Za-z0-9_]"
            )));
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate subreddit: '{name}'"
            )));
        }
    }

    Ok(())
}
