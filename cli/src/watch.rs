use std::time::Duration;

use anyhow::Result;
use jhatpat_core::AppConfig;

use crate::open_history;

/// Print a line whenever another process changes the history.
pub async fn watch(config: &AppConfig, interval_secs: u64) -> Result<()> {
    let (medium, history) = open_history(config);
    let mut changes = history.store().subscribe();

    let poller = medium.spawn_poller(Duration::from_secs(interval_secs.max(1)));
    let watcher = history.store().watch_external_changes();

    println!(
        "Watching {} ({} entries). Ctrl-C to stop.",
        medium.dir().display(),
        history.len()
    );

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let recipes = changes.borrow_and_update().clone();
                match recipes.first() {
                    Some(newest) => println!("History now has {} entries, newest: {}", recipes.len(), newest.name),
                    None => println!("History cleared"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    poller.abort();
    watcher.abort();
    Ok(())
}
