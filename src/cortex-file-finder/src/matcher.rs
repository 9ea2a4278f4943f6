//! Fuzzy acceptance and relevance scoring using nucleo-matcher.

use std::cmp::Ordering;

use nucleo_matcher::{
    Config, Matcher, Utf32Str,
    pattern::{Atom, AtomKind, CaseMatching, Normalization},
};

/// Score assigned to candidates the pattern does not match.
pub const NO_MATCH_SCORE: i64 = i64::MIN;

/// Fuzzy matcher bound to one search pattern.
///
/// Matching is case-insensitive and treats the whole pattern as a single
/// subsequence needle (whitespace and nucleo's `^`/`$`/`!` syntax are
/// taken literally).
#[derive(Debug)]
pub struct FuzzyMatcher {
    matcher: Matcher,
    atom: Atom,
    pattern: String,
    haystack_buf: Vec<char>,
}

impl FuzzyMatcher {
    /// Creates a matcher for `pattern`.
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        let atom = Atom::new(
            &pattern,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            true,
        );

        Self {
            matcher: Matcher::new(Config::DEFAULT.match_paths()),
            atom,
            pattern,
            haystack_buf: Vec::new(),
        }
    }

    /// The lowercased pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns whether `candidate` contains the pattern as a subsequence.
    pub fn accepts(&mut self, candidate: &str) -> bool {
        self.raw_score(candidate).is_some()
    }

    /// Relevance of `candidate`; higher is better.
    ///
    /// Non-matching candidates get [`NO_MATCH_SCORE`] instead of an error.
    pub fn score(&mut self, candidate: &str) -> i64 {
        self.raw_score(candidate).map_or(NO_MATCH_SCORE, i64::from)
    }

    /// Orders `a` before `b` when it is more relevant.
    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        let score_a = self.score(a);
        let score_b = self.score(b);
        by_relevance((score_a, a), (score_b, b))
    }

    fn raw_score(&mut self, candidate: &str) -> Option<u16> {
        if self.pattern.is_empty() {
            return Some(0);
        }
        if candidate.is_empty() {
            return None;
        }

        let haystack = Utf32Str::new(candidate, &mut self.haystack_buf);
        self.atom.score(haystack, &mut self.matcher)
    }
}

/// Descending score, then ascending key so equal scores order stably.
pub fn by_relevance(a: (i64, &str), b: (i64, &str)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}
