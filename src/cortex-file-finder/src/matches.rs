//! Exact/fuzzy classification with first-wins deduplication.

use indexmap::{IndexMap, IndexSet};

use crate::matcher::{FuzzyMatcher, by_relevance};

/// Pattern accepting every candidate.
pub const WILDCARD_PATTERN: &str = "*";

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Substring match, or the pattern accepts everything.
    Exact,
    /// Accepted by the fuzzy predicate.
    Fuzzy,
    /// The identifier was already classified.
    Duplicate,
    /// Not a match.
    Rejected,
}

/// Matches collected for one search.
#[derive(Debug)]
pub struct MatchSet {
    matcher: FuzzyMatcher,
    match_all: bool,
    fuzzy_match: bool,
    exact: IndexSet<String>,
    /// Identifier to the relative candidate it was accepted from.
    fuzzy: IndexMap<String, String>,
}

impl MatchSet {
    /// Creates an empty set for `pattern`.
    pub fn new(pattern: &str, fuzzy_match: bool) -> Self {
        Self {
            matcher: FuzzyMatcher::new(pattern),
            match_all: pattern.is_empty() || pattern == WILDCARD_PATTERN,
            fuzzy_match,
            exact: IndexSet::new(),
            fuzzy: IndexMap::new(),
        }
    }

    /// Classifies `candidate` (relative path) resolved to `identifier`.
    ///
    /// The first classification of an identifier wins; later reports of
    /// it are ignored.
    pub fn classify(&mut self, identifier: String, candidate: &str) -> Classification {
        if self.contains(&identifier) {
            return Classification::Duplicate;
        }

        if self.match_all || candidate.to_lowercase().contains(self.matcher.pattern()) {
            self.exact.insert(identifier);
            Classification::Exact
        } else if self.fuzzy_match && self.matcher.accepts(candidate) {
            self.fuzzy.insert(identifier, candidate.to_string());
            Classification::Fuzzy
        } else {
            Classification::Rejected
        }
    }

    /// Whether `identifier` is in either set.
    pub fn contains(&self, identifier: &str) -> bool {
        self.exact.contains(identifier) || self.fuzzy.contains_key(identifier)
    }

    /// Number of exact matches.
    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    /// Number of fuzzy matches.
    pub fn fuzzy_len(&self) -> usize {
        self.fuzzy.len()
    }

    /// Exact matches in discovery order, then fuzzy matches by descending
    /// relevance, truncated to `limit`.
    pub fn into_ranked(self, limit: Option<usize>) -> Vec<String> {
        let Self {
            mut matcher,
            exact,
            fuzzy,
            ..
        } = self;

        let mut ranked: Vec<(i64, String)> = fuzzy
            .into_iter()
            .map(|(identifier, candidate)| (matcher.score(&candidate), identifier))
            .collect();
        ranked.sort_by(|a, b| by_relevance((a.0, &a.1), (b.0, &b.1)));

        exact
            .into_iter()
            .chain(ranked.into_iter().map(|(_, identifier)| identifier))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}
