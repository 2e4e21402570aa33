//! `threadpulse view`: print the published digest.

use std::time::Duration;

use threadpulse_core::AppConfig;
use threadpulse_stream::{FileStore, SnapshotStore};

const WAITING: &str = "No digest published yet; waiting for comments...";

pub(crate) async fn view(config: &AppConfig, follow: bool, interval_secs: u64) -> anyhow::Result<()> {
    let store = FileStore::new(&config.snapshot_path);

    if !follow {
        match store.read().await? {
            Some(payload) => print!("{}", String::from_utf8_lossy(&payload)),
            None => println!("{WAITING}"),
        }
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
    let mut last: Option<Vec<u8>> = None;
    let mut announced_waiting = false;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            () = crate::shutdown_signal() => break,
        }

        match store.read().await {
            Ok(Some(payload)) if last.as_ref() != Some(&payload) => {
                print!("{}", String::from_utf8_lossy(&payload));
                last = Some(payload);
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                if !announced_waiting {
                    println!("{WAITING}");
                    announced_waiting = true;
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to read snapshot"),
        }
    }
    Ok(())
}
