// src/exec/mod.rs

//! Transport execution layer.
//!
//! - [`invocation`] turns filters and inclusion lists into the transport's
//!   argument vector and standard input.
//! - [`runner`] runs one transport process and captures its output.
//! - [`executor_loop`] runs scheduled syncs in the background, one at a time.
//! - [`backend`] provides the `TransportBackend` trait and the production
//!   `RealTransportBackend`; tests replace it with a fake.

pub mod backend;
pub mod executor_loop;
pub mod invocation;
pub mod runner;

pub use backend::{RealTransportBackend, TransportBackend};
pub use invocation::{InvocationBuilder, SyncInvocation};
pub use runner::{TransportOutput, execute};
