// tests/filter_properties.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use syncwatch::aggregate::aggregate;
use syncwatch::filter::{FilterPattern, FilterSet};
use syncwatch::types::ChangeBatch;

// Path segments made only of characters with no meaning in the filter
// language. The first character is never a dot, so `.` and `..` cannot
// appear and path normalisation leaves the segment intact.
fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-][a-z0-9_.-]{0,5}"
}

fn rel_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..5).prop_map(|segs| segs.join("/"))
}

proptest! {
    #[test]
    fn literal_pattern_matches_iff_substring(
        literal in "[a-z0-9_.-]{1,5}",
        path in rel_path(),
    ) {
        let pattern = FilterPattern::compile(&literal).unwrap();
        prop_assert_eq!(pattern.matches(&path), path.contains(&literal));
    }

    #[test]
    fn double_star_between_literals_spans_directories(
        head in segment(),
        middle in proptest::collection::vec(segment(), 0..4),
        tail in segment(),
    ) {
        let mut parts = vec![head.clone()];
        parts.extend(middle);
        parts.push(tail.clone());
        let path = parts.join("/");

        let pattern = FilterPattern::compile(&format!("/{head}**{tail}/")).unwrap();
        prop_assert!(pattern.matches(&path));
    }

    #[test]
    fn inclusion_list_is_closed_under_ancestors(
        paths in proptest::collection::vec(rel_path(), 1..8),
        removed in proptest::collection::vec(rel_path(), 0..4),
    ) {
        let root = Path::new("/root");
        let mut batch = ChangeBatch::new();
        batch.modified.extend(paths.iter().map(|p| root.join(p)));
        batch.removed.extend(removed.iter().map(|p| root.join(p)));

        let list = aggregate(&batch, &FilterSet::new(), root);

        let mut seen = HashSet::new();
        for entry in list.entries() {
            prop_assert!(seen.insert(entry.clone()), "duplicate entry {}", entry);
            prop_assert!(!entry.contains('*'), "wildcard rule {}", entry);
            let mut current = entry.as_str();
            while let Some((parent, _)) = current.rsplit_once('/') {
                prop_assert!(seen.contains(parent), "{} listed before ancestor {}", entry, parent);
                current = parent;
            }
        }

        for p in paths.iter().chain(&removed) {
            prop_assert!(list.contains(p));
        }
    }

    #[test]
    fn excluded_paths_never_reach_the_list(
        paths in proptest::collection::vec(rel_path(), 1..8),
    ) {
        let root = PathBuf::from("/root");
        let filters = FilterSet::from_patterns(["*.tmp"]).unwrap();
        let mut batch = ChangeBatch::new();
        for p in &paths {
            batch.added.insert(root.join(p));
            batch.added.insert(root.join(format!("{p}.tmp")));
        }

        let list = aggregate(&batch, &filters, &root);
        for entry in list.entries() {
            prop_assert!(!filters.excludes(entry), "{} should be excluded", entry);
        }
        for p in paths.iter().filter(|p| !filters.excludes(p)) {
            prop_assert!(list.contains(p));
        }
    }
}
