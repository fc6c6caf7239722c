use std::path::{Path, PathBuf};

use syncwatch::config::{RawConfigFile, SyncConfig, validate_config};
use syncwatch::fs::RealFileSystem;
use syncwatch::types::ChangeBatch;

/// Builder for `RawConfigFile` to simplify test setup.
pub struct ConfigBuilder {
    config: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new(local_dir: impl Into<PathBuf>, remote_dir: &str) -> Self {
        let mut config = RawConfigFile::default();
        config.sync.local_dir = Some(local_dir.into());
        config.sync.remote_dir = Some(remote_dir.to_string());
        Self { config }
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.filters.exclude.push(pattern.to_string());
        self
    }

    pub fn exclude_from(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.filters.exclude_from.push(path.into());
        self
    }

    pub fn simulate(mut self, val: bool) -> Self {
        self.config.sync.simulate = val;
        self
    }

    pub fn latency_ms(mut self, ms: u64) -> Self {
        self.config.sync.latency_ms = ms;
        self
    }

    pub fn transport(mut self, command: &str) -> Self {
        self.config.transport.command = command.to_string();
        self
    }

    pub fn option(mut self, arg: &str) -> Self {
        self.config.transport.options.push(arg.to_string());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    /// Validate against the real filesystem, resolving filter files against
    /// `base_dir`.
    pub fn build(self, base_dir: &Path) -> SyncConfig {
        validate_config(self.config, base_dir, &RealFileSystem)
            .expect("Failed to build valid config from builder")
    }
}

/// Builder for `ChangeBatch`.
#[derive(Default)]
pub struct BatchBuilder {
    batch: ChangeBatch,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified(mut self, path: impl Into<PathBuf>) -> Self {
        self.batch.modified.insert(path.into());
        self
    }

    pub fn added(mut self, path: impl Into<PathBuf>) -> Self {
        self.batch.added.insert(path.into());
        self
    }

    pub fn removed(mut self, path: impl Into<PathBuf>) -> Self {
        self.batch.removed.insert(path.into());
        self
    }

    pub fn build(self) -> ChangeBatch {
        self.batch
    }
}
