// src/config/validate.rs

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::debug;

use crate::config::model::{RawConfigFile, SyncConfig, TransportSettings};
use crate::errors::{Result, SyncwatchError};
use crate::filter::FilterSet;
use crate::fs::{FileSystem, RealFileSystem};
use crate::path::is_remote_endpoint;

/// Anything shaped like `user@host:` is meant as a remote endpoint.
static REMOTE_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s/@]+@[^\s:/]+:").expect("remote-like regex is valid")
});

impl TryFrom<RawConfigFile> for SyncConfig {
    type Error = SyncwatchError;

    /// Validate against the real filesystem, resolving relative filter files
    /// against the current directory.
    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(raw, Path::new("."), &RealFileSystem)
    }
}

/// Check a raw config and turn it into a [`SyncConfig`].
///
/// - `local_dir` must be set, local, and an existing directory.
/// - `remote_dir` must be set and well-formed.
/// - every exclusion pattern must compile and every filter file be readable.
///
/// `base_dir` is used to resolve relative `exclude_from` entries.
pub fn validate_config(
    raw: RawConfigFile,
    base_dir: &Path,
    fs: &dyn FileSystem,
) -> Result<SyncConfig> {
    let local_dir = validate_local_dir(raw.sync.local_dir.as_deref(), fs)?;
    let remote_dir = validate_destination(raw.sync.remote_dir.as_deref())?;
    validate_transport(&raw.transport.command)?;

    if raw.sync.latency_ms == 0 {
        return Err(SyncwatchError::ConfigError(
            "[sync].latency_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    let filters = build_filters(&raw.filters.exclude, &raw.filters.exclude_from, base_dir, fs)?;

    debug!(
        local = ?local_dir,
        remote = %remote_dir,
        filters = filters.len(),
        "configuration validated"
    );

    Ok(SyncConfig::new_unchecked(
        local_dir,
        remote_dir,
        TransportSettings {
            command: raw.transport.command,
            options: raw.transport.options,
        },
        raw.sync.simulate,
        Duration::from_millis(raw.sync.latency_ms),
        filters,
    ))
}

fn validate_local_dir(local_dir: Option<&Path>, fs: &dyn FileSystem) -> Result<PathBuf> {
    let Some(dir) = local_dir else {
        return Err(SyncwatchError::ConfigError(
            "no local directory given ([sync].local_dir or --local-dir)".to_string(),
        ));
    };

    if is_remote_endpoint(&dir.to_string_lossy()) {
        return Err(SyncwatchError::ConfigError(format!(
            "local directory must be a local path, not a remote endpoint: {}",
            dir.display()
        )));
    }

    if !fs.is_dir(dir) {
        return Err(SyncwatchError::ConfigError(format!(
            "local directory does not exist or is not a directory: {}",
            dir.display()
        )));
    }

    Ok(fs.canonicalize(dir)?)
}

/// Check a destination string.
///
/// Empty strings, strings containing line breaks, and `user@host:` forms
/// without an absolute remote path are rejected.
pub fn validate_destination(remote_dir: Option<&str>) -> Result<String> {
    let Some(remote) = remote_dir else {
        return Err(SyncwatchError::ConfigError(
            "no destination given ([sync].remote_dir or --remote-dir)".to_string(),
        ));
    };

    if remote.trim().is_empty() || remote.contains(['\n', '\r']) {
        return Err(SyncwatchError::InvalidDestination(remote.to_string()));
    }

    if REMOTE_LIKE.is_match(remote) && !is_remote_endpoint(remote) {
        return Err(SyncwatchError::InvalidDestination(format!(
            "{remote} (remote destinations need an absolute path, e.g. user@host:/path)"
        )));
    }

    Ok(remote.to_string())
}

fn validate_transport(command: &str) -> Result<()> {
    if command.trim().is_empty() {
        return Err(SyncwatchError::ConfigError(
            "[transport].command must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn build_filters(
    inline: &[String],
    files: &[PathBuf],
    base_dir: &Path,
    fs: &dyn FileSystem,
) -> Result<FilterSet> {
    let mut filters = FilterSet::from_patterns(inline)?;

    for file in files {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            base_dir.join(file)
        };

        let contents = fs
            .read_to_string(&path)
            .map_err(|source| SyncwatchError::FilterFile {
                path: path.clone(),
                source,
            })?;
        filters.extend_from_file_contents(&contents)?;
        debug!(file = ?path, total = filters.len(), "loaded filter file");
    }

    Ok(filters)
}
