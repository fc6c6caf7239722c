// src/engine/queue.rs

use tracing::debug;

use crate::types::ChangeBatch;

/// Work waiting to be turned into the next transport invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWork {
    /// Whole-tree sync with exclusion filters only.
    Full,
    /// Sync scoped to the changed paths.
    Changes(ChangeBatch),
}

/// Changes that arrived while a sync was already running.
///
/// Semantics:
/// - Every batch recorded while a sync is in flight is merged into a single
///   pending batch, so at most one follow-up sync runs once the current one
///   completes, and no batch is lost.
/// - A full resync request takes precedence over pending changes: a
///   whole-tree sync already covers every changed path.
#[derive(Debug, Default)]
pub struct PendingChanges {
    batch: Option<ChangeBatch>,
    full: bool,
    recorded: usize,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.batch.is_none() && !self.full
    }

    /// Number of batches and requests merged since the last `take`.
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    /// Merge a batch into the pending work.
    pub fn record_batch(&mut self, batch: ChangeBatch) {
        self.recorded += 1;
        let paths = batch.len();
        match &mut self.batch {
            Some(pending) => pending.merge(batch),
            None => self.batch = Some(batch),
        }
        debug!(
            paths,
            merged = self.recorded,
            "coalesced change batch into pending sync"
        );
    }

    /// Record an operator request for a full resync.
    pub fn record_full_resync(&mut self) {
        self.recorded += 1;
        self.full = true;
        debug!("full resync queued");
    }

    /// Drain everything that is pending into a single unit of work.
    pub fn take(&mut self) -> Option<PendingWork> {
        let batch = self.batch.take();
        let full = std::mem::take(&mut self.full);
        let recorded = std::mem::take(&mut self.recorded);

        let work = if full {
            Some(PendingWork::Full)
        } else {
            batch.map(PendingWork::Changes)
        };

        if work.is_some() {
            debug!(recorded, "drained pending work");
        }
        work
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn batch_of(path: &str) -> ChangeBatch {
        let mut b = ChangeBatch::new();
        b.modified.insert(PathBuf::from(path));
        b
    }

    #[test]
    fn batches_are_coalesced_into_one() {
        let mut pending = PendingChanges::new();
        pending.record_batch(batch_of("/r/a"));
        pending.record_batch(batch_of("/r/b"));
        assert_eq!(pending.recorded(), 2);

        match pending.take() {
            Some(PendingWork::Changes(b)) => {
                assert_eq!(b.len(), 2);
                assert!(b.modified.contains(&PathBuf::from("/r/a")));
                assert!(b.modified.contains(&PathBuf::from("/r/b")));
            }
            other => panic!("expected coalesced changes, got {other:?}"),
        }
        assert!(pending.is_empty());
        assert_eq!(pending.take(), None);
    }

    #[test]
    fn empty_batch_still_counts_as_pending() {
        let mut pending = PendingChanges::new();
        pending.record_batch(ChangeBatch::new());
        assert!(!pending.is_empty());
        assert_eq!(pending.take(), Some(PendingWork::Changes(ChangeBatch::new())));
    }

    #[test]
    fn full_resync_wins_over_changes() {
        let mut pending = PendingChanges::new();
        pending.record_batch(batch_of("/r/a"));
        pending.record_full_resync();
        assert_eq!(pending.take(), Some(PendingWork::Full));
        assert!(pending.is_empty());
    }
}
