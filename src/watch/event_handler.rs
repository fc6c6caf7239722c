// src/watch/event_handler.rs

//! Turning raw `notify` events into a [`ChangeBatch`].

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::trace;

use crate::types::ChangeBatch;

/// Fold one filesystem event into `batch`.
///
/// - create → added
/// - remove, rename-from → removed
/// - rename-to → added
/// - rename with both paths → first removed, second added
/// - rename of unknown direction → added if the path exists, removed otherwise
/// - any other modification → modified
/// - access events are ignored
///
/// Within a batch the latest event for a path wins, so a file created and
/// deleted before the batch is flushed ends up only in `removed`.
pub fn record_event(batch: &mut ChangeBatch, event: &Event) {
    trace!(?event, "recording notify event");

    match &event.kind {
        EventKind::Access(_) => {}
        EventKind::Create(_) => {
            for path in &event.paths {
                mark_added(batch, path);
            }
        }
        EventKind::Remove(_) => {
            for path in &event.paths {
                mark_removed(batch, path);
            }
        }
        EventKind::Modify(ModifyKind::Name(mode)) => record_rename(batch, *mode, &event.paths),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => {
            for path in &event.paths {
                mark_modified(batch, path);
            }
        }
    }
}

fn record_rename(batch: &mut ChangeBatch, mode: RenameMode, paths: &[PathBuf]) {
    match mode {
        RenameMode::From => paths.iter().for_each(|p| mark_removed(batch, p)),
        RenameMode::To => paths.iter().for_each(|p| mark_added(batch, p)),
        RenameMode::Both => {
            if let [from, to, ..] = paths {
                mark_removed(batch, from);
                mark_added(batch, to);
            }
        }
        RenameMode::Any | RenameMode::Other => {
            for path in paths {
                if path.exists() {
                    mark_added(batch, path);
                } else {
                    mark_removed(batch, path);
                }
            }
        }
    }
}

fn mark_added(batch: &mut ChangeBatch, path: &Path) {
    batch.removed.remove(path);
    batch.modified.remove(path);
    batch.added.insert(path.to_path_buf());
}

fn mark_modified(batch: &mut ChangeBatch, path: &Path) {
    if batch.added.contains(path) {
        return;
    }
    batch.removed.remove(path);
    batch.modified.insert(path.to_path_buf());
}

fn mark_removed(batch: &mut ChangeBatch, path: &Path) {
    batch.added.remove(path);
    batch.modified.remove(path);
    batch.removed.insert(path.to_path_buf());
}
