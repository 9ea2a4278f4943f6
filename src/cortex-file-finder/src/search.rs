//! Multi-root file search.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::FinderConfig;
use crate::matches::MatchSet;
use crate::options::{RootOptions, SearchOptions};
use crate::provider::{FileProvider, provider_for};
use crate::result::{FindOutcome, FinderStats};
use crate::root::SearchRoot;

/// Searches several roots concurrently and merges their matches.
///
/// # Example
///
/// ```no_run
/// use cortex_file_finder::{FileFinder, SearchOptions};
///
/// #[tokio::main]
/// async fn main() {
///     let finder = FileFinder::from_env();
///     let options = SearchOptions::for_roots(["file:///path/to/project"]).limit(20);
///
///     for uri in finder.find("main.rs", &options, None).await {
///         println!("{uri}");
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileFinder {
    /// Configuration for the finder.
    config: FinderConfig,

    /// Candidate listing backend.
    provider: Arc<dyn FileProvider>,
}

impl FileFinder {
    /// Creates a finder using the backend selected by `config`.
    pub fn new(config: FinderConfig) -> Self {
        let provider = provider_for(&config);
        Self { config, provider }
    }

    /// Creates a finder configured from the environment.
    pub fn from_env() -> Self {
        Self::new(FinderConfig::from_env())
    }

    /// Creates a finder with a custom listing backend.
    pub fn with_provider(config: FinderConfig, provider: Arc<dyn FileProvider>) -> Self {
        Self { config, provider }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Searches every root for files matching `pattern`.
    ///
    /// Returns file identifiers: exact matches in discovery order, then
    /// fuzzy matches by descending relevance, at most `options.limit` of
    /// them. Failing roots are logged and skipped. The result is empty if
    /// `client_token` is cancelled by the time all roots have settled.
    pub async fn find(
        &self,
        pattern: &str,
        options: &SearchOptions,
        client_token: Option<&CancellationToken>,
    ) -> Vec<String> {
        self.find_with_stats(pattern, options, client_token)
            .await
            .matches
    }

    /// Like [`FileFinder::find`], also returning search stats.
    pub async fn find_with_stats(
        &self,
        pattern: &str,
        options: &SearchOptions,
        client_token: Option<&CancellationToken>,
    ) -> FindOutcome {
        let limit = options.limit;
        let roots = options.normalized_roots();
        let mut stats = FinderStats {
            roots_searched: roots.len(),
            ..Default::default()
        };

        if limit == Some(0) {
            return FindOutcome {
                matches: Vec::new(),
                stats,
            };
        }

        // Cancelling the caller's token cancels this one; not the reverse.
        let token =
            client_token.map_or_else(CancellationToken::new, CancellationToken::child_token);

        let mut searchable: Vec<(SearchRoot, RootOptions)> = Vec::with_capacity(roots.len());
        for (identifier, root_options) in roots {
            match SearchRoot::parse(&identifier) {
                Ok(root) => searchable.push((root, root_options)),
                Err(e) => {
                    tracing::warn!(root = %identifier, error = %e, "Skipping search root");
                    stats.roots_failed += 1;
                }
            }
        }

        let mut matches = MatchSet::new(pattern, options.fuzzy_match);
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, String)>();

        let searches = join_all(searchable.iter().enumerate().map(
            |(index, (root, root_options))| {
                let tx = tx.clone();
                let token = &token;
                let provider = self.provider.as_ref();
                async move {
                    let mut on_candidate = move |candidate: String| {
                        let _ = tx.send((index, candidate));
                    };
                    let result = provider
                        .list_files(root.path(), root_options, &mut on_candidate, token)
                        .await;
                    if let Err(e) = &result {
                        tracing::warn!(
                            root = %root.identifier(),
                            provider = provider.name(),
                            error = %e,
                            "Search root failed"
                        );
                    }
                    result.is_ok()
                }
            },
        ));
        // Candidates stop flowing once every root search has dropped its sender.
        drop(tx);

        let classify = async {
            while let Some((index, candidate)) = rx.recv().await {
                stats.candidates_seen += 1;
                let Some(identifier) = searchable[index].0.resolve(&candidate) else {
                    continue;
                };
                matches.classify(identifier, &candidate);

                if let Some(limit) = limit
                    && matches.exact_len() >= limit
                    && !token.is_cancelled()
                {
                    tracing::debug!(limit, "Exact matches reached limit, stopping search");
                    stats.stopped_early = true;
                    token.cancel();
                }
            }
        };

        let (outcomes, ()) = tokio::join!(searches, classify);
        stats.roots_failed += outcomes.iter().filter(|ok| !**ok).count();
        stats.exact_matches = matches.exact_len();
        stats.fuzzy_matches = matches.fuzzy_len();
        stats.cancelled = client_token.is_some_and(CancellationToken::is_cancelled);

        let matches = if stats.cancelled {
            Vec::new()
        } else {
            matches.into_ranked(limit)
        };

        tracing::debug!(
            pattern,
            roots = stats.roots_searched,
            failed = stats.roots_failed,
            candidates = stats.candidates_seen,
            exact = stats.exact_matches,
            fuzzy = stats.fuzzy_matches,
            cancelled = stats.cancelled,
            returned = matches.len(),
            "File search finished"
        );

        FindOutcome { matches, stats }
    }
}
