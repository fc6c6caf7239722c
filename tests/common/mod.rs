#![allow(dead_code)]

pub use syncwatch_test_utils::builders;
pub use syncwatch_test_utils::{
    FakeTransport, TransportLog, init_tracing, wait_for_dispatches, with_timeout,
};

use syncwatch::engine::SyncPlanner;
use syncwatch::exec::InvocationBuilder;
use syncwatch::filter::FilterSet;
use syncwatch::path::{IdentityConverter, PathTranslator};

/// Planner for `/work/site` → `/backup/site` with the given exclusions.
pub fn site_planner(patterns: &[&str]) -> SyncPlanner {
    SyncPlanner::new(
        InvocationBuilder::new("rsync", vec![], "/work/site/", "/backup/site", false),
        FilterSet::from_patterns(patterns).unwrap(),
        "/work/site",
        "/backup/site",
        PathTranslator::with_converter(IdentityConverter),
    )
}
