// src/config/model.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::filter::FilterSet;

/// Default quiet period before a batch of changes is handed to the
/// orchestrator.
pub const DEFAULT_LATENCY_MS: u64 = 500;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [sync]
/// local_dir = "/home/me/site"
/// remote_dir = "me@example.com:/srv/www"
/// simulate = false
/// latency_ms = 500
///
/// [transport]
/// command = "rsync"
/// options = ["-t", "-v", "-z", "-e", "ssh -p 22"]
///
/// [filters]
/// exclude = [".git*"]
/// exclude_from = ["sync-excludes.txt"]
/// ```
///
/// All sections are optional; `local_dir` and `remote_dir` may instead come
/// from the command line. Nothing here has been checked yet: validation turns
/// it into a [`SyncConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub sync: SyncSection,

    #[serde(default)]
    pub transport: TransportSection,

    #[serde(default)]
    pub filters: FiltersSection,
}

/// `[sync]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncSection {
    /// Directory that is watched and transferred from. Must be local.
    #[serde(default)]
    pub local_dir: Option<PathBuf>,

    /// Destination: a local path or `user@host:/path`.
    #[serde(default)]
    pub remote_dir: Option<String>,

    /// Pass the transport's dry-run flag on every invocation.
    #[serde(default)]
    pub simulate: bool,

    /// Quiet period in milliseconds before changes are synced.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY_MS
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            local_dir: None,
            remote_dir: None,
            simulate: false,
            latency_ms: default_latency_ms(),
        }
    }
}

/// `[transport]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransportSection {
    /// Program to run, e.g. `rsync` or `/usr/local/bin/rsync`.
    #[serde(default = "default_transport_command")]
    pub command: String,

    /// Extra arguments passed on every invocation, before source and
    /// destination.
    #[serde(default)]
    pub options: Vec<String>,
}

fn default_transport_command() -> String {
    "rsync".to_string()
}

impl Default for TransportSection {
    fn default() -> Self {
        Self {
            command: default_transport_command(),
            options: Vec::new(),
        }
    }
}

/// `[filters]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersSection {
    /// Inline exclusion patterns.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Files with one exclusion pattern per line. Relative paths are resolved
    /// against the directory of the config file.
    #[serde(default)]
    pub exclude_from: Vec<PathBuf>,
}

/// Transport program and its fixed extra arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    pub command: String,
    pub options: Vec<String>,
}

/// Validated, immutable configuration for one local/remote pair.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    local_dir: PathBuf,
    remote_dir: String,
    transport: TransportSettings,
    simulate: bool,
    latency: Duration,
    filters: FilterSet,
}

impl SyncConfig {
    /// Construct a config without validation. Callers are expected to use
    /// `config::validate` unless they already hold checked values.
    pub fn new_unchecked(
        local_dir: PathBuf,
        remote_dir: String,
        transport: TransportSettings,
        simulate: bool,
        latency: Duration,
        filters: FilterSet,
    ) -> Self {
        Self {
            local_dir,
            remote_dir,
            transport,
            simulate,
            latency,
            filters,
        }
    }

    /// Canonical local directory being watched.
    pub fn local_dir(&self) -> &Path {
        &self.local_dir
    }

    pub fn remote_dir(&self) -> &str {
        &self.remote_dir
    }

    pub fn transport(&self) -> &TransportSettings {
        &self.transport
    }

    pub fn simulate(&self) -> bool {
        self.simulate
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }
}
