// src/engine/event_handlers.rs

//! Event handling logic for the core orchestrator.

use tracing::{debug, info, warn};

use crate::engine::planner::SyncPlanner;
use crate::engine::queue::{PendingChanges, PendingWork};
use crate::engine::{RunId, RuntimeOptions, ScheduledSync, SyncOutcome, SyncState};
use crate::types::ChangeBatch;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this sync to the transport backend.
    Dispatch(ScheduledSync),
    /// Request that the process exits (used for `--once` when idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn idle() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn dispatch(sync: ScheduledSync) -> Self {
        Self {
            commands: vec![CoreCommand::Dispatch(sync)],
            keep_running: true,
        }
    }
}

/// Mutable state of one local/remote pair.
///
/// At most one sync is in flight at any time; `in_flight` holds its run id.
#[derive(Debug)]
pub struct SyncSession {
    pub(crate) state: SyncState,
    pub(crate) pending: PendingChanges,
    pub(crate) in_flight: Option<RunId>,
    next_run_id: RunId,
    pub(crate) completed: u64,
    pub(crate) failed: u64,
}

impl Default for SyncSession {
    fn default() -> Self {
        Self {
            state: SyncState::Idle,
            pending: PendingChanges::new(),
            in_flight: None,
            next_run_id: 1,
            completed: 0,
            failed: 0,
        }
    }
}

impl SyncSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Number of transport runs that have completed (successfully or not).
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Number of transport runs that failed.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    fn schedule(&mut self, planner: &SyncPlanner, work: &PendingWork) -> ScheduledSync {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.in_flight = Some(run_id);
        ScheduledSync {
            run_id,
            invocation: planner.plan(work),
        }
    }
}

/// Start the session: run one whole-tree sync.
pub fn handle_start(session: &mut SyncSession, planner: &SyncPlanner) -> CoreStep {
    if session.state != SyncState::Idle {
        warn!(state = ?session.state, "start requested twice; ignoring");
        return CoreStep::idle();
    }

    info!("starting initial synchronization");
    session.state = SyncState::InitialSync;
    let sync = session.schedule(planner, &PendingWork::Full);
    CoreStep::dispatch(sync)
}

/// Handle a debounced batch of changes.
///
/// - `Watching`: plan and dispatch a sync for this batch right away.
/// - a sync is already running (or the session hasn't started): merge the
///   batch into the pending work for the next sync.
pub fn handle_changes(
    session: &mut SyncSession,
    planner: &SyncPlanner,
    batch: ChangeBatch,
) -> CoreStep {
    match session.state {
        SyncState::Watching => {
            debug!(paths = batch.len(), "changes detected; starting resync");
            session.state = SyncState::ResyncInFlight;
            let sync = session.schedule(planner, &PendingWork::Changes(batch));
            CoreStep::dispatch(sync)
        }
        SyncState::Idle | SyncState::InitialSync | SyncState::ResyncInFlight => {
            session.pending.record_batch(batch);
            CoreStep::idle()
        }
        SyncState::Stopped => CoreStep::idle(),
    }
}

/// Handle an operator request for a full resync.
pub fn handle_resync_request(session: &mut SyncSession, planner: &SyncPlanner) -> CoreStep {
    match session.state {
        SyncState::Watching => {
            info!("manual resync requested");
            session.state = SyncState::ResyncInFlight;
            let sync = session.schedule(planner, &PendingWork::Full);
            CoreStep::dispatch(sync)
        }
        SyncState::Idle | SyncState::InitialSync | SyncState::ResyncInFlight => {
            info!("manual resync requested; will run after the current sync");
            session.pending.record_full_resync();
            CoreStep::idle()
        }
        SyncState::Stopped => CoreStep::idle(),
    }
}

/// Handle completion of a transport run.
///
/// Failures are logged and counted; the session keeps watching. If work
/// piled up during the run, exactly one follow-up sync is dispatched for all
/// of it.
pub fn handle_completion(
    session: &mut SyncSession,
    planner: &SyncPlanner,
    options: &RuntimeOptions,
    run_id: RunId,
    outcome: SyncOutcome,
) -> CoreStep {
    if session.in_flight != Some(run_id) {
        warn!(
            run_id,
            in_flight = ?session.in_flight,
            "completion for a sync that is not in flight; ignoring"
        );
        return CoreStep::idle();
    }
    session.in_flight = None;
    session.completed += 1;

    match outcome {
        SyncOutcome::Success => debug!(run_id, "sync completed"),
        SyncOutcome::Failed(code) => {
            session.failed += 1;
            warn!(
                run_id,
                exit_code = code,
                "sync failed; continuing to watch for changes"
            );
        }
    }

    if session.state == SyncState::Stopped {
        return CoreStep {
            commands: Vec::new(),
            keep_running: false,
        };
    }

    if let Some(work) = session.pending.take() {
        session.state = SyncState::ResyncInFlight;
        let sync = session.schedule(planner, &work);
        return CoreStep::dispatch(sync);
    }

    if session.state == SyncState::InitialSync {
        info!("initial synchronization finished; watching for changes");
    }
    session.state = SyncState::Watching;

    if options.exit_when_idle {
        session.state = SyncState::Stopped;
        return CoreStep {
            commands: vec![CoreCommand::RequestExit],
            keep_running: false,
        };
    }

    CoreStep::idle()
}

/// Handle a shutdown request.
pub fn handle_shutdown(session: &mut SyncSession) -> CoreStep {
    info!(state = ?session.state, "shutdown requested");
    session.state = SyncState::Stopped;
    CoreStep {
        commands: Vec::new(),
        keep_running: false,
    }
}
