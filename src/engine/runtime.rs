// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::ScheduledSync;
use crate::errors::Result;
use crate::exec::TransportBackend;

use super::core::CoreOrchestrator;
use super::{CoreCommand, RuntimeEvent, SyncState};

/// What happened over the lifetime of a runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: u64,
    pub failed: u64,
    pub final_state: SyncState,
}

/// Drives the core orchestrator in response to `RuntimeEvent`s and hands
/// scheduled syncs to a `TransportBackend`.
///
/// The runtime loop is the only place the session state is touched, so two
/// syncs can never race to start against the same destination. The backend
/// reports completion through the same event channel, which keeps the loop
/// free to accept new batches while a transport is running.
pub struct Runtime<T: TransportBackend> {
    core: CoreOrchestrator,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    transport: T,
}

impl<T: TransportBackend> fmt::Debug for Runtime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<T: TransportBackend> Runtime<T> {
    pub fn new(
        core: CoreOrchestrator,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        transport: T,
    ) -> Self {
        Self {
            core,
            event_rx,
            transport,
        }
    }

    /// Main event loop.
    ///
    /// - Starts the core (initial whole-tree sync).
    /// - Consumes `RuntimeEvent`s from `event_rx` and feeds them to the core.
    /// - Executes the commands returned by the core.
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("syncwatch runtime started");

        let start = self.core.start();
        for command in start.commands {
            self.execute_command(command).await?;
        }

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        let session = self.core.session();
        let summary = RunSummary {
            completed: session.completed(),
            failed: session.failed(),
            final_state: session.state(),
        };
        info!(
            completed = summary.completed,
            failed = summary.failed,
            "runtime exiting"
        );
        Ok(summary)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::Dispatch(sync) => self.dispatch(sync).await?,
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, sync: ScheduledSync) -> Result<()> {
        debug!(
            run_id = sync.run_id,
            mode = %sync.invocation.mode,
            "dispatching sync"
        );
        self.transport.dispatch(sync).await
    }
}
