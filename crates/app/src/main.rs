use std::time::Duration;

use offline::{FileStore, HttpRemote, LedgerStore};

use crate::error::Result;

mod commands;
mod config;
mod error;
mod render;
mod run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let (settings, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tripsync={level},offline={level},engine={level}",
            level = settings.level
        ))
        .init();

    let remote = HttpRemote::new(
        &settings.remote_url,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let store = FileStore::new(&settings.data_dir);
    tracing::debug!(root = %store.root().display(), remote = %remote.url(), "opening ledger");

    // Connectivity is unknown until the first fetch succeeds.
    let ledger = LedgerStore::open(store, remote, false)?;
    let result = commands::execute(&ledger, command, &settings).await;
    ledger.shutdown()?;
    result
}
