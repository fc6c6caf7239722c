// src/filter/pattern.rs

//! Compilation of a single exclusion filter into a path predicate.
//!
//! Filter language:
//! - regular text matches any part of a path
//! - a leading `/` only matches if the path has the same beginning
//! - a trailing `/` only matches if the path has the same ending
//! - `?` matches zero or one character that isn't a `/`
//! - `*` matches any number of characters up to the next `/`
//! - `**` matches any number of characters, including `/`
//!
//! The pattern is scanned once into a list of [`Fragment`]s, which are then
//! rendered into a single regular expression.

use std::fmt;

use regex::Regex;

use crate::errors::{Result, SyncwatchError};

/// One piece of a compiled filter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    /// Leading `/`: the path must start here (separator optional).
    StartAnchor,
    /// Trailing `/`: the path must end here (separator optional).
    EndAnchor,
    /// `*`: anything except a separator, non-greedy.
    AnySegment,
    /// `**` (or longer runs): anything including separators, non-greedy.
    AnyPath,
    /// `?`: zero or one non-separator character.
    OptionalChar,
    Literal(char),
}

impl Fragment {
    fn render(&self, out: &mut String) {
        match self {
            Fragment::StartAnchor => out.push_str("^/?"),
            Fragment::EndAnchor => out.push_str("/?$"),
            Fragment::AnySegment => out.push_str("[^/]*?"),
            Fragment::AnyPath => out.push_str(".*?"),
            Fragment::OptionalChar => out.push_str("[^/]?"),
            Fragment::Literal(c) => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
    }
}

/// Scanner state: how many `*` are waiting to be flushed.
#[derive(Debug, Default)]
struct Scanner {
    stars: usize,
    fragments: Vec<Fragment>,
}

impl Scanner {
    fn flush_stars(&mut self) {
        match self.stars {
            0 => {}
            1 => self.fragments.push(Fragment::AnySegment),
            _ => self.fragments.push(Fragment::AnyPath),
        }
        self.stars = 0;
    }

    fn scan(mut self, pattern: &str) -> Vec<Fragment> {
        let last = pattern.chars().count().saturating_sub(1);

        for (pos, c) in pattern.chars().enumerate() {
            if c == '*' {
                self.stars += 1;
                continue;
            }

            self.flush_stars();

            let fragment = match c {
                '/' if pos == 0 => Fragment::StartAnchor,
                '/' if pos == last => Fragment::EndAnchor,
                '?' => Fragment::OptionalChar,
                other => Fragment::Literal(other),
            };
            self.fragments.push(fragment);
        }

        // A trailing run of stars is dropped: with partial matching it
        // cannot change the outcome.
        self.fragments
    }
}

/// A compiled exclusion filter.
#[derive(Clone)]
pub struct FilterPattern {
    raw: String,
    regex: Regex,
}

impl fmt::Debug for FilterPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPattern")
            .field("raw", &self.raw)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl FilterPattern {
    /// Compile a filter string.
    pub fn compile(pattern: &str) -> Result<Self> {
        let source = to_regex_source(pattern);
        let regex = Regex::new(&source).map_err(|source| SyncwatchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
        })
    }

    /// The pattern exactly as it was configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn anchored_start(&self) -> bool {
        self.raw.starts_with('/')
    }

    pub fn anchored_end(&self) -> bool {
        self.raw.len() > 1 && self.raw.ends_with('/')
    }

    /// Returns true if the filter matches any part of `path`.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Render a filter string into regular expression source.
pub(crate) fn to_regex_source(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    for fragment in Scanner::default().scan(pattern) {
        fragment.render(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(p: &str) -> FilterPattern {
        FilterPattern::compile(p).unwrap()
    }

    #[test]
    fn renders_expected_regex_source() {
        assert_eq!(to_regex_source(".git*"), r"\.git");
        assert_eq!(to_regex_source("/.git*"), r"^/?\.git");
        assert_eq!(to_regex_source("a/*/b"), r"a/[^/]*?/b");
        assert_eq!(to_regex_source("a/***/b"), r"a/.*?/b");
        assert_eq!(to_regex_source("tmp/"), r"tmp/?$");
        assert_eq!(to_regex_source("?x"), r"[^/]?x");
        assert_eq!(to_regex_source("/"), r"^/?");
    }

    #[test]
    fn plain_text_matches_anywhere() {
        let p = compile("node_modules");
        assert!(p.matches("node_modules"));
        assert!(p.matches("web/node_modules/react/index.js"));
        assert!(!p.matches("web/src/index.js"));
    }

    #[test]
    fn leading_slash_anchors_to_start() {
        let p = compile("/.git*");
        assert!(p.matches("/.git/config"));
        assert!(p.matches(".git/config"));
        assert!(p.matches(".gitignore"));
        assert!(!p.matches("something/.gitignore-like/file"));
        assert!(p.anchored_start());
        assert!(!p.anchored_end());
    }

    #[test]
    fn trailing_slash_anchors_to_end() {
        let p = compile("cache/");
        assert!(p.matches("build/cache"));
        assert!(p.matches("build/cache/"));
        assert!(!p.matches("build/cache/item.bin"));
        assert!(p.anchored_end());
    }

    #[test]
    fn double_star_crosses_separators() {
        let p = compile("a/**/b");
        assert!(p.matches("a/x/y/b"));
        assert!(p.matches("a/x/b"));
    }

    #[test]
    fn single_star_stays_within_segment() {
        let p = compile("a/*/b");
        assert!(!p.matches("a/x/y/b"));
        assert!(p.matches("a/x/b"));
    }

    #[test]
    fn question_mark_matches_zero_or_one_char() {
        let p = compile("/log?.txt");
        assert!(p.matches("log1.txt"));
        // Zero characters also match.
        assert!(p.matches("log.txt"));
        assert!(!p.matches("log12.txt"));
        assert!(!p.matches("log/.txt"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let p = compile("a+b(1).[x]");
        assert!(p.matches("dir/a+b(1).[x]"));
        assert!(!p.matches("dir/aab1x"));
    }

    #[test]
    fn non_ascii_is_escaped_per_char() {
        let p = compile("résumé*.pdf");
        assert!(p.matches("docs/résumé-2024.pdf"));
    }
}
