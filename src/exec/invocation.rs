// src/exec/invocation.rs

//! Building transport invocations.
//!
//! Every invocation runs the transport as
//! ```text
//! <command> -r --delete --ignore-errors --force [-n] <mode flags> <options...>
//!     <source>/ <destination>
//! ```
//! and feeds the filter rules on standard input:
//!
//! - blanket mode: `--exclude-from=-`, stdin = the raw exclusion patterns
//! - scoped mode: `--include-from=- --exclude=*`, stdin = the inclusion list

use crate::aggregate::InclusionFilterList;
use crate::config::SyncConfig;
use crate::filter::FilterSet;
use crate::path::PathTranslator;
use crate::types::FilterMode;

/// Flags passed on every invocation: recurse, delete extraneous files at the
/// destination, keep deleting when individual files fail, and remove
/// non-empty directories.
pub const BASE_FLAGS: [&str; 4] = ["-r", "--delete", "--ignore-errors", "--force"];
pub const SIMULATE_FLAG: &str = "-n";
pub const BLANKET_FLAGS: [&str; 1] = ["--exclude-from=-"];
pub const SCOPED_FLAGS: [&str; 2] = ["--include-from=-", "--exclude=*"];

/// Fully resolved arguments for one transport run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub mode: FilterMode,
    /// Filter rules written to the transport's standard input.
    pub stdin: String,
}

impl SyncInvocation {
    /// Human-readable command line, quoted for display only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(display_quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn display_quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Builds invocations for one local/remote pair.
///
/// Source and destination are translated once at construction; building an
/// invocation afterwards is pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationBuilder {
    program: String,
    options: Vec<String>,
    source: String,
    destination: String,
    simulate: bool,
}

impl InvocationBuilder {
    pub fn new(
        program: impl Into<String>,
        options: Vec<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        simulate: bool,
    ) -> Self {
        Self {
            program: program.into(),
            options,
            source: source.into(),
            destination: destination.into(),
            simulate,
        }
    }

    pub fn from_config(cfg: &SyncConfig, translator: &PathTranslator) -> Self {
        let local = cfg.local_dir().to_string_lossy();
        Self::new(
            cfg.transport().command.clone(),
            cfg.transport().options.clone(),
            translator.source_path(&local),
            translator.to_transport_path(cfg.remote_dir()),
            cfg.simulate(),
        )
    }

    /// Transport form of the source directory (always ends in `/`).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whole-tree sync, excluding what `filters` match.
    pub fn blanket(&self, filters: &FilterSet) -> SyncInvocation {
        let stdin = filters.patterns().collect::<Vec<_>>().join("\n");
        self.build(FilterMode::Blanket, &BLANKET_FLAGS, stdin)
    }

    /// Sync only the paths in `list` (and what the transport needs to reach
    /// them).
    pub fn scoped(&self, list: &InclusionFilterList) -> SyncInvocation {
        self.build(FilterMode::Scoped, &SCOPED_FLAGS, list.to_transport_input())
    }

    fn build(&self, mode: FilterMode, mode_flags: &[&str], stdin: String) -> SyncInvocation {
        let mut args: Vec<String> = BASE_FLAGS.iter().map(|s| s.to_string()).collect();
        if self.simulate {
            args.push(SIMULATE_FLAG.to_string());
        }
        args.extend(mode_flags.iter().map(|s| s.to_string()));
        args.extend(self.options.iter().cloned());
        args.push(self.source.clone());
        args.push(self.destination.clone());

        SyncInvocation {
            program: self.program.clone(),
            args,
            mode,
            stdin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(simulate: bool) -> InvocationBuilder {
        InvocationBuilder::new(
            "rsync",
            vec!["-t".to_string(), "-e".to_string(), "ssh -p 22".to_string()],
            "/work/site/",
            "me@host:/srv/my\\ www",
            simulate,
        )
    }

    #[test]
    fn blanket_invocation_layout() {
        let filters = FilterSet::from_patterns([".git*", "*.swp"]).unwrap();
        let inv = builder(false).blanket(&filters);

        assert_eq!(inv.mode, FilterMode::Blanket);
        assert_eq!(
            inv.args,
            vec![
                "-r",
                "--delete",
                "--ignore-errors",
                "--force",
                "--exclude-from=-",
                "-t",
                "-e",
                "ssh -p 22",
                "/work/site/",
                "me@host:/srv/my\\ www",
            ]
        );
        assert_eq!(inv.stdin, ".git*\n*.swp");
    }

    #[test]
    fn scoped_invocation_with_simulate() {
        let mut list = InclusionFilterList::new();
        list.push_closure("docs/index.html");
        let inv = builder(true).scoped(&list);

        assert_eq!(inv.mode, FilterMode::Scoped);
        assert_eq!(
            &inv.args[..7],
            [
                "-r",
                "--delete",
                "--ignore-errors",
                "--force",
                "-n",
                "--include-from=-",
                "--exclude=*",
            ]
        );
        assert_eq!(inv.stdin, "/docs\n/docs/index.html");
    }

    #[test]
    fn blanket_builds_are_identical() {
        let filters = FilterSet::from_patterns(["/tmp/"]).unwrap();
        let b = builder(false);
        assert_eq!(b.blanket(&filters), b.blanket(&filters));
    }

    #[test]
    fn command_line_quotes_for_display() {
        let inv = builder(false).blanket(&FilterSet::new());
        let line = inv.command_line();
        assert!(line.starts_with(
            "rsync -r --delete --ignore-errors --force --exclude-from=- -t -e 'ssh -p 22'"
        ));
        assert_eq!(display_quote("it's"), r"'it'\''s'");
    }
}
