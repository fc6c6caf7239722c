// src/engine/core.rs

//! Pure core orchestrator state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`RuntimeEvent`]s and produces:
//! - an updated session state
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`engine::runtime::Runtime`) is responsible for reading
//! events from channels and handing scheduled syncs to the transport backend.
//!
//! The core is unit tested without any Tokio, channels, filesystem, or
//! processes.

use crate::engine::event_handlers::{
    CoreStep, SyncSession, handle_changes, handle_completion, handle_resync_request,
    handle_shutdown, handle_start,
};
use crate::engine::planner::SyncPlanner;
use crate::engine::{RuntimeEvent, RuntimeOptions, SyncState};

/// Pure core orchestrator.
///
/// Owns the session state, the planner and the runtime options. It has no
/// channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreOrchestrator {
    session: SyncSession,
    planner: SyncPlanner,
    options: RuntimeOptions,
}

impl CoreOrchestrator {
    pub fn new(planner: SyncPlanner, options: RuntimeOptions) -> Self {
        Self {
            session: SyncSession::new(),
            planner,
            options,
        }
    }

    pub fn state(&self) -> SyncState {
        self.session.state()
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    /// Expose pending-queue emptiness (for tests).
    pub fn pending_is_empty(&self) -> bool {
        self.session.pending.is_empty()
    }

    /// `Idle → InitialSync`: dispatch the initial whole-tree sync.
    pub fn start(&mut self) -> CoreStep {
        handle_start(&mut self.session, &self.planner)
    }

    /// Handle a single runtime event, updating state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ChangesDetected(batch) => {
                handle_changes(&mut self.session, &self.planner, batch)
            }
            RuntimeEvent::ResyncRequested => {
                handle_resync_request(&mut self.session, &self.planner)
            }
            RuntimeEvent::SyncCompleted { run_id, outcome } => handle_completion(
                &mut self.session,
                &self.planner,
                &self.options,
                run_id,
                outcome,
            ),
            RuntimeEvent::ShutdownRequested => handle_shutdown(&mut self.session),
        }
    }
}
