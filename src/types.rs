// src/types.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

/// Set of absolute local paths reported by the watcher after a quiet period.
///
/// Batches are merged (set union) when several arrive while a sync is already
/// running, so the follow-up sync covers all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub modified: BTreeSet<PathBuf>,
    pub added: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Total number of paths across all three sets.
    pub fn len(&self) -> usize {
        self.modified.len() + self.added.len() + self.removed.len()
    }

    /// Merge `other` into `self`.
    pub fn merge(&mut self, other: ChangeBatch) {
        self.modified.extend(other.modified);
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }

    /// Paths that still exist (modified or added), in sorted order.
    pub fn present(&self) -> impl Iterator<Item = &PathBuf> {
        self.modified.union(&self.added)
    }
}

/// How filters are delivered to the transport for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Whole tree, standard input carries the exclusion patterns.
    Blanket,
    /// Only the listed paths, standard input carries the inclusion list and
    /// everything else is excluded.
    Scoped,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::Blanket => f.write_str("blanket"),
            FilterMode::Scoped => f.write_str("scoped"),
        }
    }
}
