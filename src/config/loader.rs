// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawConfigFile, SyncConfig};
use crate::config::validate::validate_config;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** check paths or
/// compile filters. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_fs(&RealFileSystem, path.as_ref())
}

/// Like [`load_from_path`], reading through the given filesystem.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load the config file if it exists, otherwise start from defaults.
///
/// A missing file is fine as long as the command line supplies the
/// directories; validation reports what is still missing.
pub fn load_or_default(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    if fs.exists(path) {
        load_from_fs(fs, path)
    } else {
        debug!(?path, "config file not found; using defaults");
        Ok(RawConfigFile::default())
    }
}

/// Load a configuration file from path and validate it.
///
/// Relative filter files are resolved against the config file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    validate_config(raw, &config_base_dir(path), &RealFileSystem)
}

/// Directory that relative paths inside a config file are resolved against.
///
/// - `configs/Syncwatch.toml` → `configs`
/// - a bare `Syncwatch.toml` → the current working directory
pub fn config_base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Default config file name, looked up in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Syncwatch.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn missing_file_yields_defaults() {
        let fs = MockFileSystem::new();
        let raw = load_or_default(&fs, Path::new("/nowhere/Syncwatch.toml")).unwrap();
        assert!(raw.sync.local_dir.is_none());
        assert_eq!(raw.transport.command, "rsync");
    }

    #[test]
    fn parses_all_sections() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/cfg/Syncwatch.toml",
            r#"
[sync]
local_dir = "/work/site"
remote_dir = "me@host:/srv/www"
simulate = true
latency_ms = 250

[transport]
command = "/opt/bin/rsync"
options = ["-t", "-e", "ssh -p 2222"]

[filters]
exclude = [".git*", "*.swp"]
exclude_from = ["extra.txt"]
"#,
        );

        let raw = load_or_default(&fs, Path::new("/cfg/Syncwatch.toml")).unwrap();
        assert_eq!(raw.sync.local_dir.as_deref(), Some(Path::new("/work/site")));
        assert_eq!(raw.sync.remote_dir.as_deref(), Some("me@host:/srv/www"));
        assert!(raw.sync.simulate);
        assert_eq!(raw.sync.latency_ms, 250);
        assert_eq!(raw.transport.command, "/opt/bin/rsync");
        assert_eq!(raw.transport.options, vec!["-t", "-e", "ssh -p 2222"]);
        assert_eq!(raw.filters.exclude, vec![".git*", "*.swp"]);
        assert_eq!(raw.filters.exclude_from, vec![PathBuf::from("extra.txt")]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let fs = MockFileSystem::new();
        fs.add_file("/cfg/Syncwatch.toml", "[sync]\nlocal_directory = \"/x\"\n");
        let err = load_or_default(&fs, Path::new("/cfg/Syncwatch.toml")).unwrap_err();
        assert!(matches!(err, crate::errors::SyncwatchError::TomlError(_)));
    }

    #[test]
    fn base_dir_is_config_parent() {
        assert_eq!(
            config_base_dir(Path::new("configs/Syncwatch.toml")),
            PathBuf::from("configs")
        );
    }
}
