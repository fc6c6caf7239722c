// src/filter/set.rs

use std::sync::Arc;

use crate::errors::Result;
use crate::filter::pattern::FilterPattern;

/// Ordered collection of exclusion filters.
///
/// A path is excluded if *any* filter matches it. Insertion order is kept only
/// so the raw patterns can be handed to the transport in the order they were
/// configured.
///
/// The set is built during configuration and is read-only afterwards; clones
/// share the compiled matchers.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    patterns: Arc<Vec<FilterPattern>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of raw pattern strings.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for pattern in patterns {
            set.add(pattern.as_ref())?;
        }
        Ok(set)
    }

    /// Compile and append one pattern.
    pub fn add(&mut self, pattern: &str) -> Result<()> {
        let compiled = FilterPattern::compile(pattern)?;
        Arc::make_mut(&mut self.patterns).push(compiled);
        Ok(())
    }

    /// Append every non-blank line of a filter file.
    pub fn extend_from_file_contents(&mut self, contents: &str) -> Result<()> {
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            self.add(line)?;
        }
        Ok(())
    }

    /// Returns true if any filter in the set matches `path`.
    pub fn excludes(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Raw pattern strings in insertion order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(FilterPattern::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
