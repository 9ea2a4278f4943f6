//! Search request options and their per-root normalization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Filtering rules for a single search root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RootOptions {
    /// Globs a file must match to be listed.
    pub include_patterns: Vec<String>,

    /// Globs that exclude matching files.
    pub exclude_patterns: Vec<String>,

    /// Whether ignore files are honored. `None` inherits the request value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_git_ignore: Option<bool>,
}

impl RootOptions {
    /// Creates empty root options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include glob.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Adds an exclude glob.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the ignore-file policy for this root.
    pub fn use_git_ignore(mut self, use_git_ignore: bool) -> Self {
        self.use_git_ignore = Some(use_git_ignore);
        self
    }

    /// Effective ignore-file policy; unset means honored.
    pub fn honors_git_ignore(&self) -> bool {
        self.use_git_ignore.unwrap_or(true)
    }
}

/// Options for a [`crate::FileFinder::find`] request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Roots to search in addition to the keys of `root_options`.
    pub root_uris: Vec<String>,

    /// Per-root filtering rules, keyed by root identifier.
    pub root_options: IndexMap<String, RootOptions>,

    /// Whether candidates that are not substring matches may still be
    /// accepted as fuzzy matches.
    pub fuzzy_match: bool,

    /// Maximum number of results. `None` is unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Ignore-file policy for roots that do not set their own.
    pub use_git_ignore: bool,

    /// Include globs applied to every root.
    pub include_patterns: Vec<String>,

    /// Exclude globs applied to every root.
    pub exclude_patterns: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            root_uris: Vec::new(),
            root_options: IndexMap::new(),
            fuzzy_match: true,
            limit: None,
            use_git_ignore: true,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
        }
    }
}

impl SearchOptions {
    /// Creates options searching the given roots with default settings.
    pub fn for_roots(roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            root_uris: roots.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Adds a root with its own filtering rules.
    pub fn with_root(mut self, root: impl Into<String>, options: RootOptions) -> Self {
        self.root_options.insert(root.into(), options);
        self
    }

    /// Sets the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enables or disables fuzzy classification.
    pub fn fuzzy_match(mut self, enabled: bool) -> Self {
        self.fuzzy_match = enabled;
        self
    }

    /// Sets the default ignore-file policy.
    pub fn use_git_ignore(mut self, use_git_ignore: bool) -> Self {
        self.use_git_ignore = use_git_ignore;
        self
    }

    /// Adds an include glob applied to every root.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Adds an exclude glob applied to every root.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Builds the working per-root options.
    ///
    /// `root_options` entries keep their order and come first; roots only
    /// named in `root_uris` follow. Every entry gets the global globs
    /// appended after its own and inherits `use_git_ignore` when unset.
    pub fn normalized_roots(&self) -> IndexMap<String, RootOptions> {
        let mut roots = self.root_options.clone();
        for uri in &self.root_uris {
            roots.entry(uri.clone()).or_default();
        }

        for options in roots.values_mut() {
            options
                .include_patterns
                .extend(self.include_patterns.iter().cloned());
            options
                .exclude_patterns
                .extend(self.exclude_patterns.iter().cloned());
            if options.use_git_ignore.is_none() {
                options.use_git_ignore = Some(self.use_git_ignore);
            }
        }

        roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = SearchOptions::default();
        assert!(options.fuzzy_match);
        assert!(options.use_git_ignore);
        assert_eq!(options.limit, None);
        assert!(RootOptions::default().honors_git_ignore());
    }

    #[test]
    fn test_normalize_seeds_roots_from_uris() {
        let options = SearchOptions::for_roots(["file:///a", "file:///b"])
            .with_root("file:///b", RootOptions::new().include("*.rs"))
            .with_root("file:///c", RootOptions::new());

        let roots = options.normalized_roots();
        let keys: Vec<&str> = roots.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["file:///b", "file:///c", "file:///a"]);
        assert_eq!(roots["file:///b"].include_patterns, vec!["*.rs"]);
    }

    #[test]
    fn test_normalize_appends_global_patterns_after_root_patterns() {
        let options = SearchOptions::default()
            .with_root(
                "file:///w",
                RootOptions::new().include("src/**").exclude("*.tmp"),
            )
            .include("*.ts")
            .exclude("node_modules/**");

        let roots = options.normalized_roots();
        let root = &roots["file:///w"];
        assert_eq!(root.include_patterns, vec!["src/**", "*.ts"]);
        assert_eq!(root.exclude_patterns, vec!["*.tmp", "node_modules/**"]);
    }

    #[test]
    fn test_normalize_inherits_git_ignore_only_when_unset() {
        let options = SearchOptions::for_roots(["file:///a"])
            .with_root("file:///b", RootOptions::new().use_git_ignore(true))
            .use_git_ignore(false);

        let roots = options.normalized_roots();
        assert_eq!(roots["file:///a"].use_git_ignore, Some(false));
        assert_eq!(roots["file:///b"].use_git_ignore, Some(true));
    }

    #[test]
    fn test_normalize_does_not_touch_request() {
        let options = SearchOptions::default()
            .with_root("file:///w", RootOptions::new())
            .include("*.md");

        let _ = options.normalized_roots();
        let _ = options.normalized_roots();
        assert!(options.root_options["file:///w"].include_patterns.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "rootUris": ["file:///w"],
            "rootOptions": {"file:///x": {"excludePatterns": ["*.log"], "useGitIgnore": false}},
            "fuzzyMatch": false,
            "limit": 5
        }"#;

        let options: SearchOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.root_uris, vec!["file:///w"]);
        assert!(!options.fuzzy_match);
        assert!(options.use_git_ignore);
        assert_eq!(options.limit, Some(5));
        let root = &options.root_options["file:///x"];
        assert_eq!(root.exclude_patterns, vec!["*.log"]);
        assert_eq!(root.use_git_ignore, Some(false));
    }
}
