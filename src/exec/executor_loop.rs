// src/exec/executor_loop.rs

//! Background loop that runs transport invocations one after another.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::{RuntimeEvent, ScheduledSync};
use crate::exec::runner::run_sync;

/// Spawn the background executor loop.
///
/// The returned sender is what [`RealTransportBackend`](super::RealTransportBackend)
/// forwards scheduled syncs to. Syncs are awaited one at a time, so even if
/// two were queued there is never more than one transport process per
/// executor.
pub fn spawn_executor(runtime_tx: mpsc::Sender<RuntimeEvent>) -> mpsc::Sender<ScheduledSync> {
    let (tx, mut rx) = mpsc::channel::<ScheduledSync>(8);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(sync) = rx.recv().await {
            let run_id = sync.run_id;
            run_sync(sync, &runtime_tx).await;
            debug!(run_id, "transport run finished");
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}
