//! Bounded memory of recently processed comment identifiers.

use std::collections::{HashSet, VecDeque};

/// Number of poll batches whose identifiers are remembered.
pub const DEDUP_DEPTH: usize = 5;

/// Rolling history of the identifiers seen in the last [`DEDUP_DEPTH`] polls.
///
/// Batches are kept most-recent-first. Starting a batch once the window is
/// full discards the oldest one, after which its identifiers count as unseen
/// again. Memory is bounded by depth × batch size.
#[derive(Debug, Clone)]
pub struct DedupWindow {
    batches: VecDeque<HashSet<String>>,
    depth: usize,
}

impl Default for DedupWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl DedupWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(DEDUP_DEPTH)
    }

    /// A window retaining `depth` batches (at least one).
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            batches: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Begin a new, empty current batch.
    pub fn start_batch(&mut self) {
        if self.batches.len() == self.depth {
            self.batches.pop_back();
        }
        self.batches.push_front(HashSet::new());
    }

    /// `true` if `id` is present in any retained batch, including the current one.
    #[must_use]
    pub fn seen(&self, id: &str) -> bool {
        self.batches.iter().any(|batch| batch.contains(id))
    }

    /// Add `id` to the current batch, opening one if none has been started.
    pub fn record(&mut self, id: &str) {
        if self.batches.is_empty() {
            self.start_batch();
        }
        if let Some(current) = self.batches.front_mut() {
            current.insert(id.to_string());
        }
    }

    /// Number of batches currently retained.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.batches.len()
    }
}
