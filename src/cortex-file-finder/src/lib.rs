#![allow(clippy::missing_errors_doc, clippy::uninlined_format_args)]
//! Cortex File Finder - Multi-root, cancellable fuzzy file search.
//!
//! Given a pattern and a set of search roots, each with its own filtering
//! rules, this crate lists the files under every root concurrently and
//! returns a ranked, deduplicated, size-bounded list of `file://` URIs.
//!
//! # Features
//!
//! - One ripgrep (`rg --files`) process per root, streamed line by line
//! - Alternative in-process backend built on the `ignore` crate
//! - Per-root include/exclude globs and ignore-file policy
//! - Case-insensitive substring matches ranked ahead of fuzzy matches
//!   scored with nucleo-matcher
//! - Cancellation through `tokio_util::sync::CancellationToken`
//!
//! # Example
//!
//! ```no_run
//! use cortex_file_finder::{FileFinder, RootOptions, SearchOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let finder = FileFinder::from_env();
//!     let options = SearchOptions::for_roots(["file:///path/to/project"])
//!         .with_root("file:///path/to/docs", RootOptions::new().include("*.md"))
//!         .exclude("node_modules/**")
//!         .limit(50);
//!
//!     for uri in finder.find("readme", &options, None).await {
//!         println!("{uri}");
//!     }
//! }
//! ```

mod args;
mod config;
mod error;
mod matcher;
mod matches;
mod options;
mod provider;
mod result;
mod ripgrep;
mod root;
mod search;
mod walk;

pub use args::build_args;
pub use config::{Backend, FinderConfig, FinderConfigBuilder, RG_PATH_ENV};
pub use error::{FinderError, FinderResult};
pub use matcher::{FuzzyMatcher, NO_MATCH_SCORE, by_relevance};
pub use matches::{Classification, MatchSet, WILDCARD_PATTERN};
pub use options::{RootOptions, SearchOptions};
pub use provider::{FileProvider, OnCandidate, provider_for};
pub use result::{FindOutcome, FinderStats};
pub use ripgrep::RipgrepProvider;
pub use root::SearchRoot;
pub use search::FileFinder;
pub use walk::WalkProvider;

/// Re-export so callers can build tokens without naming tokio-util.
pub use tokio_util::sync::CancellationToken;
