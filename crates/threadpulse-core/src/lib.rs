//! Shared configuration and reference data for threadpulse.

mod app_config;
mod config;
mod error;
mod feeds;
mod lexicon;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, LexiconError};
pub use feeds::{load_feeds, validate_subreddits, FeedConfig, FeedsFile};
pub use lexicon::Lexicon;
