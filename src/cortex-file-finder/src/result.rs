//! Search outcome types.

/// Bookkeeping for one [`crate::FileFinder::find_with_stats`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderStats {
    /// Roots after normalization.
    pub roots_searched: usize,

    /// Roots whose listing failed (invalid identifier, launch or tool error).
    pub roots_failed: usize,

    /// Candidate lines reported by all roots.
    pub candidates_seen: usize,

    /// Distinct exact matches found.
    pub exact_matches: usize,

    /// Distinct fuzzy matches found.
    pub fuzzy_matches: usize,

    /// Whether the listing stopped early because `limit` exact matches
    /// were already known.
    pub stopped_early: bool,

    /// Whether the caller cancelled the search.
    pub cancelled: bool,
}

impl FinderStats {
    /// True when there were roots to search and every one of them failed.
    ///
    /// Distinguishes "every root failed" from "nothing matched", which
    /// both yield an empty result.
    pub fn all_roots_failed(&self) -> bool {
        self.roots_searched > 0 && self.roots_failed == self.roots_searched
    }
}

/// Result list together with its stats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOutcome {
    /// File identifiers: exact matches first, then ranked fuzzy matches.
    pub matches: Vec<String>,

    /// Search bookkeeping.
    pub stats: FinderStats,
}
