use std::io::Write;

use threadpulse_core::{AppConfig, LexiconError};

use super::*;
use crate::run::{resolve_subreddits, run};

fn test_config(dir: &std::path::Path) -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        feeds_path: dir.join("feeds.yaml"),
        lexicon_path: dir.join("lexicon.tsv"),
        snapshot_path: dir.join("digest.txt"),
        feed_base_url: "http://127.0.0.1:9".to_string(),
        user_agent: "threadpulse-test".to_string(),
        request_timeout_secs: 1,
        scorer_workers: 1,
        tick_ms: 1000,
        record_malformed: false,
    }
}

#[test]
fn parses_run_without_subreddits() {
    let cli = Cli::try_parse_from(["threadpulse", "run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run { subreddits } if subreddits.is_empty()));
}

#[test]
fn parses_run_with_subreddits() {
    let cli = Cli::try_parse_from(["threadpulse", "run", "rust", "programming"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Run { subreddits } => assert_eq!(subreddits, ["rust", "programming"]),
        Commands::View { .. } => panic!("expected run"),
    }
}

#[test]
fn parses_view_defaults() {
    let cli = Cli::try_parse_from(["threadpulse", "view"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::View {
            follow: false,
            interval_secs: 10
        }
    ));
}

#[test]
fn parses_view_follow_with_interval() {
    let cli = Cli::try_parse_from(["threadpulse", "view", "--follow", "--interval-secs", "3"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::View {
            follow: true,
            interval_secs: 3
        }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["threadpulse"]).is_err());
}

#[test]
fn cli_subreddits_override_feeds_file() {
    let names = vec!["rust".to_string(), "golang".to_string()];
    let resolved = resolve_subreddits(&names, std::path::Path::new("/does/not/exist.yaml"))
        .expect("cli names are valid");
    assert_eq!(resolved, names);
}

#[test]
fn invalid_cli_subreddit_is_rejected() {
    let names = vec!["rust".to_string(), "no spaces".to_string()];
    assert!(resolve_subreddits(&names, std::path::Path::new("unused.yaml")).is_err());
}

#[test]
fn falls_back_to_feeds_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "feeds:\n  - subreddit: rust\n  - subreddit: worldnews").unwrap();

    let resolved = resolve_subreddits(&[], file.path()).unwrap();
    assert_eq!(resolved, ["rust", "worldnews"]);
}

#[tokio::test]
async fn run_fails_when_lexicon_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let err = run(&config, &["rust".to_string()]).await.unwrap_err();

    assert!(err.to_string().contains("loading lexicon from"), "got {err:#}");
    assert!(matches!(
        err.downcast_ref::<LexiconError>(),
        Some(LexiconError::Io { .. })
    ));
    assert!(!config.snapshot_path.exists());
}
