// src/config/mod.rs

//! Configuration loading and validation for syncwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate paths, destination and filters (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    config_base_dir, default_config_path, load_and_validate, load_from_path, load_or_default,
};
pub use model::{
    FiltersSection, RawConfigFile, SyncConfig, SyncSection, TransportSection, TransportSettings,
};
pub use validate::{validate_config, validate_destination};
