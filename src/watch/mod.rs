// src/watch/mod.rs

//! File watching and change batching.
//!
//! Wires up a cross-platform filesystem watcher (`notify`) and turns its
//! events into debounced [`ChangeBatch`](crate::types::ChangeBatch)es. It does
//! not know about filters or the transport.

pub mod event_handler;
pub mod watcher;

pub use event_handler::record_event;
pub use watcher::{WatcherHandle, next_batch, spawn_watcher};
