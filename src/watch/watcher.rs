// src/watch/watcher.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::RuntimeEvent;
use crate::types::ChangeBatch;
use crate::watch::event_handler::record_event;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and sends one
/// `RuntimeEvent::ChangesDetected` per quiet period.
///
/// - `root` is the local directory being mirrored.
/// - `latency` is how long the tree has to stay quiet before a batch is
///   flushed.
/// - `runtime_tx` is the channel into the main runtime.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    latency: Duration,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world. Never
    // blocks the notify thread.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("syncwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("syncwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!(root = %root.display(), latency_ms = latency.as_millis() as u64, "file watcher started");

    tokio::spawn(async move {
        while let Some(batch) = next_batch(&mut event_rx, latency).await {
            if batch.is_empty() {
                continue;
            }
            debug!(paths = batch.len(), "flushing change batch");
            if runtime_tx
                .send(RuntimeEvent::ChangesDetected(batch))
                .await
                .is_err()
            {
                debug!("runtime channel closed; stopping watcher loop");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Wait for the next event, then keep folding events into one batch until
/// `latency` passes without a new one.
///
/// Returns `None` once the event source is gone and nothing is buffered.
pub async fn next_batch(
    rx: &mut mpsc::UnboundedReceiver<Event>,
    latency: Duration,
) -> Option<ChangeBatch> {
    let first = rx.recv().await?;
    let mut batch = ChangeBatch::new();
    record_event(&mut batch, &first);

    loop {
        match tokio::time::timeout(latency, rx.recv()).await {
            Ok(Some(event)) => record_event(&mut batch, &event),
            Ok(None) | Err(_) => break,
        }
    }
    Some(batch)
}
