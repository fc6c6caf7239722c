// src/aggregate.rs

//! Turning a batch of changed paths into the transport's inclusion list.
//!
//! A traversal-based transport only descends into directories that are
//! included, so including `sub/deep/file.txt` alone is not enough: `sub` and
//! `sub/deep` must be included as well. [`aggregate`] computes that ancestor
//! closure for every changed path that survives the exclusion filters.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::filter::FilterSet;
use crate::path::relative_to;
use crate::types::ChangeBatch;

/// Ordered, de-duplicated list of root-relative paths to include.
///
/// Entries use forward slashes and carry no leading separator. Every entry's
/// ancestors appear before it in the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionFilterList {
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl InclusionFilterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.seen.contains(entry)
    }

    /// Append `entry` unless it is already present. Returns true if added.
    pub fn push(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if self.seen.contains(&entry) {
            return false;
        }
        self.seen.insert(entry.clone());
        self.entries.push(entry);
        true
    }

    /// Append every level of `rel_path`, shallowest first, ending with the
    /// path itself.
    pub fn push_closure(&mut self, rel_path: &str) {
        let mut levels: Vec<&str> = Vec::new();
        let mut current = rel_path;
        loop {
            levels.push(current);
            match current.rsplit_once('/') {
                Some((parent, _)) if !parent.is_empty() => current = parent,
                _ => break,
            }
        }

        for level in levels.into_iter().rev() {
            self.push(level);
        }
    }

    /// Render the list as transport include rules, one per line.
    ///
    /// Each rule is prefixed with `/` so it is anchored at the transfer root
    /// instead of matching at any depth.
    pub fn to_transport_input(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("/{e}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Compute the inclusion list for `batch`.
///
/// - Paths outside `root` are skipped with a warning.
/// - Paths matched by `filters` are dropped.
/// - Modified and added paths contribute their full ancestor closure.
/// - Removed paths contribute their ancestor closure as well; the transport
///   deletes included entries that no longer exist at the source.
///
/// An empty result means nothing survived; the caller should fall back to a
/// whole-tree sync with exclusion filters only.
pub fn aggregate(batch: &ChangeBatch, filters: &FilterSet, root: &Path) -> InclusionFilterList {
    let mut list = InclusionFilterList::new();

    for path in batch.present() {
        if let Some(rel) = surviving_relative(root, path, filters) {
            list.push_closure(&rel);
        }
    }

    // A removed path is listed with its ancestors so the transport reaches
    // the now-missing entry and `--delete` removes it at the destination.
    // Nothing broader than the path itself is included: scoped runs carry no
    // exclusion rules, so a whole-directory rule would leak excluded files.
    for path in &batch.removed {
        if let Some(rel) = surviving_relative(root, path, filters) {
            list.push_closure(&rel);
        }
    }

    debug!(
        changed = batch.len(),
        included = list.len(),
        "aggregated change batch"
    );
    list
}

fn surviving_relative(root: &Path, path: &Path, filters: &FilterSet) -> Option<String> {
    let Some(rel) = relative_to(root, path) else {
        warn!(?path, ?root, "changed path is outside the sync root; skipping");
        return None;
    };

    let rel = rel.trim_matches('/');
    if rel.is_empty() {
        return None;
    }

    if filters.excludes(rel) {
        debug!(path = %rel, "changed path excluded by filters");
        return None;
    }

    Some(rel.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn batch(modified: &[&str], added: &[&str], removed: &[&str]) -> ChangeBatch {
        let mut b = ChangeBatch::new();
        b.modified.extend(modified.iter().map(PathBuf::from));
        b.added.extend(added.iter().map(PathBuf::from));
        b.removed.extend(removed.iter().map(PathBuf::from));
        b
    }

    #[test]
    fn closure_is_shallow_to_deep() {
        let b = batch(&["/root/sub/deep/file.txt"], &[], &[]);
        let list = aggregate(&b, &FilterSet::new(), Path::new("/root"));
        assert_eq!(list.entries(), ["sub", "sub/deep", "sub/deep/file.txt"]);
        assert_eq!(list.to_transport_input(), "/sub\n/sub/deep\n/sub/deep/file.txt");
    }

    #[test]
    fn shared_ancestors_are_listed_once() {
        let b = batch(&["/root/a/b/one.txt"], &["/root/a/b/two.txt", "/root/a/c.txt"], &[]);
        let list = aggregate(&b, &FilterSet::new(), Path::new("/root"));
        assert_eq!(
            list.entries(),
            ["a", "a/b", "a/b/one.txt", "a/b/two.txt", "a/c.txt"]
        );
    }

    #[test]
    fn excluded_paths_are_dropped() {
        let filters = FilterSet::from_patterns(["/.git*", "*.swp"]).unwrap();
        let b = batch(
            &["/root/.git/index", "/root/src/main.rs", "/root/src/.main.rs.swp"],
            &[],
            &[],
        );
        let list = aggregate(&b, &filters, Path::new("/root"));
        assert_eq!(list.entries(), ["src", "src/main.rs"]);
    }

    #[test]
    fn fully_excluded_batch_yields_empty_list() {
        let filters = FilterSet::from_patterns([".git"]).unwrap();
        let b = batch(&["/root/.git/index", "/root/.git/HEAD"], &[], &[]);
        assert!(aggregate(&b, &filters, Path::new("/root")).is_empty());
        assert!(aggregate(&ChangeBatch::new(), &filters, Path::new("/root")).is_empty());
    }

    #[test]
    fn paths_outside_root_are_skipped() {
        let b = batch(&["/elsewhere/file", "/root/ok.txt"], &[], &[]);
        let list = aggregate(&b, &FilterSet::new(), Path::new("/root"));
        assert_eq!(list.entries(), ["ok.txt"]);
    }

    #[test]
    fn root_itself_is_ignored() {
        let b = batch(&["/root"], &[], &[]);
        assert!(aggregate(&b, &FilterSet::new(), Path::new("/root")).is_empty());
    }

    #[test]
    fn removed_path_is_listed_with_its_ancestors() {
        let b = batch(&[], &[], &["/root/docs/old/page.html"]);
        let list = aggregate(&b, &FilterSet::new(), Path::new("/root"));
        assert_eq!(list.entries(), ["docs", "docs/old", "docs/old/page.html"]);
    }

    #[test]
    fn removed_top_level_path_includes_itself() {
        let b = batch(&[], &[], &["/root/stale.txt"]);
        let list = aggregate(&b, &FilterSet::new(), Path::new("/root"));
        assert_eq!(list.entries(), ["stale.txt"]);
    }

    #[test]
    fn removal_never_includes_excluded_siblings() {
        let filters = FilterSet::from_patterns(["*.swp", "secret"]).unwrap();
        let b = batch(&["/root/css/main.css"], &[], &["/root/css/old.css"]);
        let list = aggregate(&b, &filters, Path::new("/root"));

        assert_eq!(list.entries(), ["css", "css/main.css", "css/old.css"]);
        for entry in list.entries() {
            assert!(!entry.contains('*'), "wildcard rule {entry} in scoped list");
            assert!(!filters.excludes(entry));
        }
        // Excluded files next to the removed one stay out of the transfer.
        for hidden in ["css/.main.css.swp", "css/secret/key.pem"] {
            assert!(filters.excludes(hidden));
            assert!(!list.contains(hidden));
        }
    }

    #[test]
    fn removed_excluded_path_is_ignored() {
        let filters = FilterSet::from_patterns(["*.tmp"]).unwrap();
        let b = batch(&[], &[], &["/root/a/x.tmp"]);
        assert!(aggregate(&b, &filters, Path::new("/root")).is_empty());
    }
}
