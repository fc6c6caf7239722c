// src/engine/mod.rs

//! Sync orchestration.
//!
//! This module ties together:
//! - the session state machine (`Idle → InitialSync → Watching ⇄ ResyncInFlight`,
//!   `Stopped` on shutdown)
//! - the pending-change queue (what happens when batches arrive while a sync
//!   is running)
//! - the planner that turns pending work into a transport invocation
//! - the runtime event loop that reacts to change batches, sync completions,
//!   manual resync requests and shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::exec::SyncInvocation;
use crate::types::ChangeBatch;

/// Monotonic identifier of one transport run.
pub type RunId = u64;

/// Outcome of a transport process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Success,
    Failed(i32),
}

/// Where the orchestrator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    InitialSync,
    Watching,
    ResyncInFlight,
    Stopped,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit once the orchestrator is watching with nothing pending
    /// (used for `--once`).
    pub exit_when_idle: bool,
}

/// A sync handed to the transport backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSync {
    pub run_id: RunId,
    pub invocation: SyncInvocation,
}

/// Events flowing into the runtime from the watcher, the transport backend
/// and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The watcher reported a debounced batch of changes.
    ChangesDetected(ChangeBatch),
    /// Operator asked for a full resync.
    ResyncRequested,
    /// A transport run finished.
    SyncCompleted { run_id: RunId, outcome: SyncOutcome },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod planner;
pub mod queue;
pub mod runtime;

pub use core::CoreOrchestrator;
pub use event_handlers::{CoreCommand, CoreStep, SyncSession};
pub use planner::SyncPlanner;
pub use queue::{PendingChanges, PendingWork};
pub use runtime::{RunSummary, Runtime};
