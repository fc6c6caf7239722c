// src/exec/backend.rs

//! Pluggable transport backend abstraction.
//!
//! The runtime talks to a `TransportBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake transport in tests.
//!
//! - `RealTransportBackend` is the production implementation. It forwards
//!   scheduled syncs to the executor loop in [`executor_loop`](super::executor_loop),
//!   which runs the transport and reports `SyncCompleted` back to the runtime.
//! - Tests can provide their own backend that records invocations and emits
//!   completions directly (or holds them back to simulate a slow transfer).

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{RuntimeEvent, ScheduledSync};
use crate::errors::{Error, Result};

use super::executor_loop::spawn_executor;

/// Trait abstracting how a scheduled sync is executed.
///
/// Implementations must eventually send exactly one
/// `RuntimeEvent::SyncCompleted` per dispatched sync; the orchestrator does
/// not start another sync until it arrives.
pub trait TransportBackend: Send {
    fn dispatch(
        &mut self,
        sync: ScheduledSync,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real transport backend used in production.
pub struct RealTransportBackend {
    tx: mpsc::Sender<ScheduledSync>,
}

impl RealTransportBackend {
    /// Create a new backend wired to the given runtime event sender.
    ///
    /// This spawns the background executor loop immediately.
    pub fn new(runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let tx = spawn_executor(runtime_tx);
        Self { tx }
    }
}

impl TransportBackend for RealTransportBackend {
    fn dispatch(
        &mut self,
        sync: ScheduledSync,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone the sender so the future doesn't borrow `self` across `await`.
        let tx = self.tx.clone();

        Box::pin(async move {
            tx.send(sync).await.map_err(Error::from)?;
            Ok(())
        })
    }
}
