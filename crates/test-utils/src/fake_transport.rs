use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use syncwatch::engine::{RuntimeEvent, ScheduledSync, SyncOutcome};
use syncwatch::errors::Result;
use syncwatch::exec::TransportBackend;

/// Shared record of every sync handed to a [`FakeTransport`].
#[derive(Debug, Clone, Default)]
pub struct TransportLog {
    inner: Arc<Mutex<Vec<ScheduledSync>>>,
}

impl TransportLog {
    pub fn dispatched(&self) -> Vec<ScheduledSync> {
        self.inner.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<ScheduledSync> {
        self.inner.lock().unwrap().last().cloned()
    }

    fn push(&self, sync: ScheduledSync) {
        self.inner.lock().unwrap().push(sync);
    }
}

/// A fake transport that:
/// - records which syncs were dispatched
/// - either reports `SyncCompleted` immediately (with scripted outcomes,
///   `Success` once the script runs out) or holds completions back so the
///   test can send them itself and observe what piles up meanwhile.
pub struct FakeTransport {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    log: TransportLog,
    auto_complete: bool,
    outcomes: VecDeque<SyncOutcome>,
}

impl FakeTransport {
    /// Completes every sync successfully right away.
    pub fn auto(runtime_tx: mpsc::Sender<RuntimeEvent>, log: TransportLog) -> Self {
        Self {
            runtime_tx,
            log,
            auto_complete: true,
            outcomes: VecDeque::new(),
        }
    }

    /// Never completes on its own.
    pub fn held(runtime_tx: mpsc::Sender<RuntimeEvent>, log: TransportLog) -> Self {
        Self {
            auto_complete: false,
            ..Self::auto(runtime_tx, log)
        }
    }

    /// Outcomes to report, in dispatch order.
    pub fn with_outcomes(mut self, outcomes: impl IntoIterator<Item = SyncOutcome>) -> Self {
        self.outcomes = outcomes.into_iter().collect();
        self
    }
}

impl TransportBackend for FakeTransport {
    fn dispatch(
        &mut self,
        sync: ScheduledSync,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let run_id = sync.run_id;
        self.log.push(sync);

        let completion = self.auto_complete.then(|| {
            self.outcomes.pop_front().unwrap_or(SyncOutcome::Success)
        });

        Box::pin(async move {
            if let Some(outcome) = completion {
                // Report from a separate task: the runtime is the only reader of
                // this channel and is busy awaiting this future.
                tokio::spawn(async move {
                    let _ = tx.send(RuntimeEvent::SyncCompleted { run_id, outcome }).await;
                });
            }
            Ok(())
        })
    }
}
