//! Throttle deciding when the digest is published.

use std::sync::Arc;

use crate::aggregator::Aggregator;
use crate::clock::Clock;
use crate::digest::{Digest, DEFAULT_TOP_N};
use crate::error::StoreError;
use crate::store::SnapshotStore;

/// Minimum spacing between two publishes.
pub const PUBLISH_THROTTLE_MS: i64 = 30_000;

/// Publishes at most once per [`PUBLISH_THROTTLE_MS`], driven by comment
/// arrival rather than a timer.
///
/// The very first call only sets the baseline: publishing right away would
/// show a digest built from a single comment.
pub struct PublishGate {
    clock: Arc<dyn Clock>,
    last_published: i64,
    initialized: bool,
    top_n: usize,
}

impl std::fmt::Debug for PublishGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishGate")
            .field("last_published", &self.last_published)
            .field("initialized", &self.initialized)
            .field("top_n", &self.top_n)
            .finish_non_exhaustive()
    }
}

impl PublishGate {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_top_n(clock, DEFAULT_TOP_N)
    }

    #[must_use]
    pub fn with_top_n(clock: Arc<dyn Clock>, top_n: usize) -> Self {
        Self {
            clock,
            last_published: 0,
            initialized: false,
            top_n,
        }
    }

    /// Call once per processed comment, after [`Aggregator::update`].
    ///
    /// Returns `Ok(true)` when a digest was written. The baseline moves
    /// forward before the write, so a failed write is retried on the next
    /// throttle window and never rolls back aggregation state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the snapshot store rejects the write.
    pub async fn on_update<S: SnapshotStore>(
        &mut self,
        aggregator: &Aggregator,
        store: &S,
    ) -> Result<bool, StoreError> {
        let now = self.clock.now_millis();
        if !self.should_publish(now) {
            return Ok(false);
        }

        let payload = Digest::build(aggregator, self.top_n, now).render();
        tracing::info!(
            stories = aggregator.len(),
            bytes = payload.len(),
            "publishing digest"
        );
        store.write(payload.as_bytes()).await?;
        Ok(true)
    }

    /// Advance the throttle state for a call at `now`; `true` means publish.
    fn should_publish(&mut self, now: i64) -> bool {
        if !self.initialized {
            self.initialized = true;
            self.last_published = now;
            return false;
        }
        if now - self.last_published > PUBLISH_THROTTLE_MS {
            self.last_published = now;
            return true;
        }
        false
    }

    /// Timestamp of the last publish (or the baseline set by the first call).
    #[must_use]
    pub fn last_published(&self) -> Option<i64> {
        self.initialized.then_some(self.last_published)
    }
}
