//! Token weight table used for additive sentiment scoring.

use std::collections::HashMap;
use std::path::Path;

use crate::LexiconError;

/// Immutable token → signed weight mapping.
///
/// Built once at startup and shared read-only (typically behind an `Arc`)
/// by every scorer. Keys are stored lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    weights: HashMap<String, i32>,
}

impl Lexicon {
    /// Build a lexicon from in-memory pairs. Later duplicates overwrite earlier ones.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, i32)>,
        S: AsRef<str>,
    {
        let weights = pairs
            .into_iter()
            .map(|(token, weight)| (token.as_ref().to_lowercase(), weight))
            .collect();
        Self { weights }
    }

    /// Load a tab-separated `token<TAB>weight` file (AFINN layout).
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Io`] if the file cannot be read,
    /// [`LexiconError::Parse`] on a malformed line, and
    /// [`LexiconError::Empty`] if no entries were found.
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|e| LexiconError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let lexicon = Self::parse(&content)?;
        if lexicon.is_empty() {
            return Err(LexiconError::Empty {
                path: path.display().to_string(),
            });
        }

        tracing::info!(
            path = %path.display(),
            entries = lexicon.len(),
            "loaded sentiment lexicon"
        );
        Ok(lexicon)
    }

    /// Parse lexicon text. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Parse`] with the 1-based line number of the
    /// first malformed line.
    pub fn parse(content: &str) -> Result<Self, LexiconError> {
        let mut weights = HashMap::new();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }

            let Some((token, weight)) = line.rsplit_once('\t') else {
                return Err(LexiconError::Parse {
                    line: line_no,
                    reason: "expected <token><TAB><weight>".to_string(),
                });
            };

            let token = token.trim().to_lowercase();
            if token.is_empty() {
                return Err(LexiconError::Parse {
                    line: line_no,
                    reason: "empty token".to_string(),
                });
            }

            let weight = weight
                .trim()
                .parse::<i32>()
                .map_err(|e| LexiconError::Parse {
                    line: line_no,
                    reason: format!("invalid weight \"{}\": {e}", weight.trim()),
                })?;

            if weights.insert(token.clone(), weight).is_some() {
                tracing::warn!(token = %token, line = line_no, "duplicate lexicon token; keeping last");
            }
        }

        Ok(Self { weights })
    }

    /// Weight of `token`, matched case-insensitively like the stored keys.
    #[must_use]
    pub fn weight(&self, token: &str) -> Option<i32> {
        if token.chars().any(char::is_uppercase) {
            self.weights.get(&token.to_lowercase()).copied()
        } else {
            self.weights.get(token).copied()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
