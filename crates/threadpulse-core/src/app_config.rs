use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub log_level: String,
    pub feeds_path: PathBuf,
    pub lexicon_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub feed_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub scorer_workers: usize,
    pub tick_ms: u64,
    /// Whether entries without usable content are remembered by the dedup
    /// window. When `false` they are re-examined on every poll.
    pub record_malformed: bool,
}
