// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawConfigFile;

/// Command-line arguments for `syncwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "syncwatch",
    version,
    about = "Continuously mirror a local directory to a destination when files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Syncwatch.toml` in the current working directory. The file is
    /// optional when `--local-dir` and `--remote-dir` are given.
    #[arg(long, value_name = "PATH", default_value = "Syncwatch.toml")]
    pub config: PathBuf,

    /// Local directory to watch (overrides `[sync].local_dir`).
    #[arg(long, value_name = "DIR")]
    pub local_dir: Option<PathBuf>,

    /// Destination, local path or `user@host:/path` (overrides
    /// `[sync].remote_dir`).
    #[arg(long, value_name = "DEST")]
    pub remote_dir: Option<String>,

    /// Pass the transport's dry-run flag; nothing at the destination changes.
    #[arg(long)]
    pub simulate: bool,

    /// Run the initial full sync, then exit without watching.
    #[arg(long)]
    pub once: bool,

    /// Validate config and print the initial transport invocation without
    /// running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Quiet period in milliseconds before a batch of changes is synced.
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Extra exclusion pattern (repeatable), added after the config's.
    #[arg(long = "exclude", value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Extra filter file (repeatable), one pattern per line.
    #[arg(long = "exclude-from", value_name = "FILE")]
    pub exclude_from: Vec<PathBuf>,

    /// Transport program (overrides `[transport].command`).
    #[arg(long, value_name = "PROGRAM")]
    pub transport: Option<String>,

    /// Extra transport argument (repeatable), appended to
    /// `[transport].options`.
    #[arg(long = "transport-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub transport_args: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SYNCWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Layer command-line values over what was read from the config file.
    pub fn apply_overrides(&self, raw: &mut RawConfigFile) {
        if let Some(dir) = &self.local_dir {
            raw.sync.local_dir = Some(dir.clone());
        }
        if let Some(dest) = &self.remote_dir {
            raw.sync.remote_dir = Some(dest.clone());
        }
        if self.simulate {
            raw.sync.simulate = true;
        }
        if let Some(ms) = self.latency_ms {
            raw.sync.latency_ms = ms;
        }
        if let Some(cmd) = &self.transport {
            raw.transport.command = cmd.clone();
        }
        raw.transport.options.extend(self.transport_args.iter().cloned());
        raw.filters.exclude.extend(self.exclude.iter().cloned());
        // Filter files named on the command line are relative to the working
        // directory, not to the config file.
        raw.filters.exclude_from.extend(
            self.exclude_from
                .iter()
                .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone())),
        );
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_and_extend() {
        let args = CliArgs::try_parse_from([
            "syncwatch",
            "--local-dir",
            "/work/site",
            "--remote-dir",
            "me@host:/srv",
            "--simulate",
            "--exclude",
            "*.tmp",
            "--transport-arg",
            "-z",
            "--latency-ms",
            "100",
        ])
        .unwrap();

        let mut raw = RawConfigFile::default();
        raw.filters.exclude.push(".git*".to_string());
        args.apply_overrides(&mut raw);

        assert_eq!(raw.sync.local_dir, Some(PathBuf::from("/work/site")));
        assert_eq!(raw.sync.remote_dir.as_deref(), Some("me@host:/srv"));
        assert!(raw.sync.simulate);
        assert_eq!(raw.sync.latency_ms, 100);
        assert_eq!(raw.transport.options, vec!["-z"]);
        assert_eq!(raw.filters.exclude, vec![".git*", "*.tmp"]);
    }

    #[test]
    fn absent_flags_keep_file_values() {
        let args = CliArgs::try_parse_from(["syncwatch"]).unwrap();
        let mut raw = RawConfigFile::default();
        raw.sync.simulate = true;
        raw.sync.remote_dir = Some("/backup".to_string());
        args.apply_overrides(&mut raw);

        assert!(raw.sync.simulate);
        assert_eq!(raw.sync.remote_dir.as_deref(), Some("/backup"));
        assert_eq!(args.config, PathBuf::from("Syncwatch.toml"));
    }
}
