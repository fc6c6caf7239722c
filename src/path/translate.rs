// src/path/translate.rs

//! Path handling between the local filesystem and the transport command line.
//!
//! Two kinds of destination exist: remote endpoints of the form
//! `user@host:/remote/path`, and everything else, which is treated as a local
//! path. The distinction decides how whitespace is escaped: the remote shell
//! re-tokenizes its arguments, a local path does not.

use std::fmt;
use std::path::Path;
use std::process::Command;
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::warn;

static REMOTE_ENDPOINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]+@[^\s:/]+:/").expect("remote endpoint regex is valid")
});

/// Converts a native path into the form the transport expects.
///
/// Only needed on platforms whose native separator differs from the
/// transport's (e.g. Windows with a Cygwin `rsync`).
pub trait PathConverter: Send + Sync + fmt::Debug {
    fn convert(&self, path: &str) -> Result<String>;
}

/// Leaves paths untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl PathConverter for IdentityConverter {
    fn convert(&self, path: &str) -> Result<String> {
        Ok(path.to_string())
    }
}

/// Shells out to `cygpath -u <path>`.
#[derive(Debug, Clone)]
pub struct CygpathConverter {
    program: String,
}

impl Default for CygpathConverter {
    fn default() -> Self {
        Self {
            program: "cygpath".to_string(),
        }
    }
}

impl PathConverter for CygpathConverter {
    fn convert(&self, path: &str) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-u")
            .arg(path)
            .output()
            .with_context(|| format!("running {} for {path:?}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {} for {path:?}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Returns true when running on a platform that needs [`CygpathConverter`].
pub fn is_windows_like() -> bool {
    cfg!(windows)
        || std::env::var("OS")
            .map(|os| os.to_lowercase().contains("windows"))
            .unwrap_or(false)
}

/// Returns true if `path` looks like `user@host:/remote/path`.
pub fn is_remote_endpoint(path: &str) -> bool {
    REMOTE_ENDPOINT.is_match(path)
}

/// Translates local and destination paths into transport arguments.
#[derive(Debug, Clone)]
pub struct PathTranslator {
    converter: Arc<dyn PathConverter>,
}

impl Default for PathTranslator {
    fn default() -> Self {
        Self::for_platform()
    }
}

impl PathTranslator {
    /// Translator using `cygpath` on Windows-like platforms and no conversion
    /// elsewhere.
    pub fn for_platform() -> Self {
        if is_windows_like() {
            Self::with_converter(CygpathConverter::default())
        } else {
            Self::with_converter(IdentityConverter)
        }
    }

    pub fn with_converter(converter: impl PathConverter + 'static) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    /// Render `path` the way the transport expects it on its command line.
    ///
    /// - remote endpoint: every whitespace character becomes `\ `
    /// - local path: trimmed, repeated separators collapsed, converted through
    ///   the platform converter, whitespace normalised to plain spaces
    pub fn to_transport_path(&self, path: &str) -> String {
        if is_remote_endpoint(path) {
            return escape_whitespace(path);
        }

        let collapsed = collapse_separators(path.trim());
        let converted = match self.converter.convert(&collapsed) {
            Ok(p) => p,
            Err(err) => {
                warn!(path = %collapsed, error = %err, "path conversion failed; using path as-is");
                collapsed
            }
        };

        converted
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect()
    }

    /// Transport form of the source directory, with exactly one trailing `/`
    /// so the transport copies the directory's contents.
    pub fn source_path(&self, local_root: &str) -> String {
        let mut path = self.to_transport_path(local_root);
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        path
    }

    /// Map a local path onto the destination tree.
    ///
    /// Returns `None` when `local_path` is not inside `local_root`. A trailing
    /// `/` on `local_path` is kept on the result. The planner uses it for
    /// per-path debug logs; it is public for callers that need the
    /// destination of a single local path.
    pub fn map_to_destination(
        &self,
        local_path: &str,
        local_root: &str,
        remote_root: &str,
    ) -> Option<String> {
        let local = self.to_transport_path(local_path);
        let root = self.to_transport_path(local_root);
        let remote = self.to_transport_path(remote_root);

        let rest = strip_root(&local, &root)?;

        let mut mapped = remote.trim_end_matches('/').to_string();
        if !rest.is_empty() {
            mapped.push('/');
            if is_remote_endpoint(remote_root) {
                mapped.push_str(&escape_whitespace(rest));
            } else {
                mapped.push_str(rest);
            }
        }

        let wants_slash = local_path.ends_with('/') || (rest.is_empty() && remote.ends_with('/'));
        if (wants_slash || mapped.is_empty()) && !mapped.ends_with('/') {
            mapped.push('/');
        }
        Some(mapped)
    }
}

/// Strip `root` from the start of `path`, returning the remainder without a
/// leading separator.
///
/// If `path` does not start with `root`, the original is returned unmodified.
pub fn to_relative(path: &str, root: &str) -> String {
    match strip_root(path, root) {
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

/// Convert `path` into a string relative to `root`, with forward slashes.
///
/// The prefix strip goes through [`to_relative`]; if `path` is not under
/// `root` as given (symlinks, different absolute prefixes for the same
/// directory) both paths are canonicalized and the strip is retried. Returns
/// `None` if `path` is not under `root`.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    if let Some(rel) = relative_str(root, path) {
        return Some(rel);
    }

    match (root.canonicalize(), path.canonicalize()) {
        (Ok(root_canon), Ok(path_canon)) => relative_str(&root_canon, &path_canon),
        _ => None,
    }
}

fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let root = forward_slashes(root);
    let path = forward_slashes(path);
    // `to_relative` hands outside paths back unchanged, so check first.
    strip_root(&path, &root)?;
    Some(to_relative(&path, &root))
}

fn forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let root = root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;
    if rest.is_empty() {
        return Some(rest);
    }
    // Must stop at a separator: `/data` is not a root of `/database`.
    if root.is_empty() || rest.starts_with('/') {
        return Some(rest.trim_start_matches('/'));
    }
    None
}

fn escape_whitespace(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_whitespace() {
            out.push_str("\\ ");
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse_separators(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}
