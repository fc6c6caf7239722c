// src/engine/planner.rs

//! Turning pending work into a concrete transport invocation.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::config::SyncConfig;
use crate::engine::queue::PendingWork;
use crate::exec::{InvocationBuilder, SyncInvocation};
use crate::filter::FilterSet;
use crate::path::PathTranslator;

/// Everything needed to build invocations for one local/remote pair.
///
/// Pure once constructed: planning the same work twice yields equal
/// invocations.
#[derive(Debug, Clone)]
pub struct SyncPlanner {
    builder: InvocationBuilder,
    filters: FilterSet,
    root: PathBuf,
    remote_dir: String,
    translator: PathTranslator,
}

impl SyncPlanner {
    pub fn new(
        builder: InvocationBuilder,
        filters: FilterSet,
        root: impl Into<PathBuf>,
        remote_dir: impl Into<String>,
        translator: PathTranslator,
    ) -> Self {
        Self {
            builder,
            filters,
            root: root.into(),
            remote_dir: remote_dir.into(),
            translator,
        }
    }

    pub fn from_config(cfg: &SyncConfig, translator: PathTranslator) -> Self {
        let builder = InvocationBuilder::from_config(cfg, &translator);
        Self::new(
            builder,
            cfg.filters().clone(),
            cfg.local_dir(),
            cfg.remote_dir(),
            translator,
        )
    }

    pub fn builder(&self) -> &InvocationBuilder {
        &self.builder
    }

    /// Whole-tree sync with exclusion filters.
    pub fn full(&self) -> SyncInvocation {
        self.builder.blanket(&self.filters)
    }

    /// Build the invocation for `work`.
    ///
    /// A change batch that leaves nothing to include (empty, or everything
    /// excluded) falls back to a whole-tree sync.
    pub fn plan(&self, work: &PendingWork) -> SyncInvocation {
        let batch = match work {
            PendingWork::Full => return self.full(),
            PendingWork::Changes(batch) => batch,
        };

        let list = aggregate(batch, &self.filters, &self.root);
        if list.is_empty() {
            info!(
                changed = batch.len(),
                "no includable paths in batch; running whole-tree sync"
            );
            return self.full();
        }

        if tracing::enabled!(tracing::Level::DEBUG) {
            let root = self.root.to_string_lossy();
            for path in batch.present().chain(batch.removed.iter()) {
                let local = path.to_string_lossy();
                if let Some(dest) =
                    self.translator
                        .map_to_destination(&local, &root, &self.remote_dir)
                {
                    debug!(local = %local, destination = %dest, "scheduling path");
                }
            }
        }

        self.builder.scoped(&list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::IdentityConverter;
    use crate::types::{ChangeBatch, FilterMode};

    fn planner(patterns: &[&str]) -> SyncPlanner {
        SyncPlanner::new(
            InvocationBuilder::new("rsync", vec![], "/work/site/", "/backup/site", false),
            FilterSet::from_patterns(patterns).unwrap(),
            "/work/site",
            "/backup/site",
            PathTranslator::with_converter(IdentityConverter),
        )
    }

    #[test]
    fn changes_plan_a_scoped_sync() {
        let mut batch = ChangeBatch::new();
        batch.modified.insert(PathBuf::from("/work/site/css/main.css"));

        let inv = planner(&[".git*"]).plan(&PendingWork::Changes(batch));
        assert_eq!(inv.mode, FilterMode::Scoped);
        assert_eq!(inv.stdin, "/css\n/css/main.css");
    }

    #[test]
    fn fully_excluded_changes_fall_back_to_blanket() {
        let mut batch = ChangeBatch::new();
        batch.modified.insert(PathBuf::from("/work/site/.git/index"));

        let p = planner(&[".git*"]);
        let inv = p.plan(&PendingWork::Changes(batch));
        assert_eq!(inv.mode, FilterMode::Blanket);
        assert_eq!(inv, p.full());
        assert_eq!(inv.stdin, ".git*");
    }

    #[test]
    fn removal_plans_scoped_sync_without_excluded_content() {
        let mut batch = ChangeBatch::new();
        batch.removed.insert(PathBuf::from("/work/site/css/old.css"));

        let p = planner(&["*.swp", "secret"]);
        let inv = p.plan(&PendingWork::Changes(batch));
        assert_eq!(inv.mode, FilterMode::Scoped);
        assert_eq!(inv.stdin, "/css\n/css/old.css");

        // No include rule may reach a path the exclusion filters match.
        for rule in inv.stdin.lines() {
            let rel = rule.trim_start_matches('/');
            assert!(!rel.contains('*'), "wildcard include {rule}");
            assert!(!p.filters.excludes(rel), "excluded path {rule} included");
        }
    }

    #[test]
    fn full_work_is_idempotent() {
        let p = planner(&["*.tmp", "/cache/"]);
        assert_eq!(p.plan(&PendingWork::Full), p.plan(&PendingWork::Full));
    }
}
