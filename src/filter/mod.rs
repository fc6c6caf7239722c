// src/filter/mod.rs

//! Exclusion filters.
//!
//! - [`pattern`] compiles one filter string into a predicate over a path.
//! - [`set`] combines compiled filters; a path is excluded if any matches.

pub mod pattern;
pub mod set;

pub use pattern::FilterPattern;
pub use set::FilterSet;
