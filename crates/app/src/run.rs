//! Long-running sync loop.

use std::time::Duration;

use offline::{LedgerEvent, LedgerStore, LocalStore, Notice, RemoteAuthority, SyncState};
use tokio::{
    sync::broadcast::error::RecvError,
    time::{self, MissedTickBehavior},
};

use crate::{commands::sync, config::AppConfig, error::Result};

pub async fn run<S, R>(store: &LedgerStore<S, R>, config: &AppConfig) -> Result<()>
where
    S: LocalStore + Clone,
    R: RemoteAuthority,
{
    let mut events = store.subscribe();
    let mut refresh = time::interval(Duration::from_secs(config.refresh_interval_secs.max(1)));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut probe = time::interval(Duration::from_secs(config.probe_interval_secs.max(1)));
    probe.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Both intervals fire immediately; the refresh tick covers startup.
    probe.tick().await;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!(
        refresh_secs = config.refresh_interval_secs,
        probe_secs = config.probe_interval_secs,
        "sync loop started"
    );

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal?;
                tracing::info!("shutdown requested");
                break;
            }
            _ = refresh.tick() => {
                refresh_step(store).await;
            }
            _ = probe.tick() => {
                // Probing only matters while offline or stuck on a failed push.
                let stuck = matches!(store.sync_state(), SyncState::Paused(_));
                if !store.is_online() || stuck {
                    let reachable = refresh_step(store).await;
                    if reachable && stuck {
                        store.drain().await;
                    }
                }
            }
            event = events.recv() => match event {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "event log lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}

/// One refresh. A store failure is logged and retried on the next tick.
async fn refresh_step<S, R>(store: &LedgerStore<S, R>) -> bool
where
    S: LocalStore + Clone,
    R: RemoteAuthority,
{
    match sync(store).await {
        Ok(reachable) => reachable,
        Err(err) => {
            tracing::warn!(error = %err, "refresh failed, retrying on next tick");
            false
        }
    }
}

fn log_event(event: &LedgerEvent) {
    match event {
        LedgerEvent::LedgerRecomputed => tracing::debug!("balances recomputed"),
        LedgerEvent::SyncStateChanged(state) => tracing::debug!(?state, "sync state"),
        LedgerEvent::Notice(Notice::SyncPaused { reason }) => {
            tracing::warn!(%reason, "sync paused")
        }
        LedgerEvent::Notice(Notice::RefreshFailed { reason }) => {
            tracing::warn!(%reason, "refresh failed")
        }
        LedgerEvent::Notice(notice) => tracing::info!(?notice, "notice"),
    }
}
