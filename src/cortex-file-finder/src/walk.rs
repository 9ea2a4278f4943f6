//! In-process file listing with the `ignore` crate.
//!
//! Follows the same rules as the ripgrep backend: include/exclude globs
//! become overrides, and disabling ignore files also lists hidden entries.

use std::path::Path;

use async_trait::async_trait;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::{Walk, WalkBuilder};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{FinderError, FinderResult};
use crate::options::RootOptions;
use crate::provider::{FileProvider, OnCandidate};

/// Candidates buffered between the walker thread and the consumer.
const WALK_CHANNEL_CAPACITY: usize = 256;

/// Walks the root on a blocking thread.
#[derive(Debug, Clone, Default)]
pub struct WalkProvider;

impl WalkProvider {
    /// Creates a new walk provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileProvider for WalkProvider {
    fn name(&self) -> &str {
        "walk"
    }

    async fn list_files(
        &self,
        root: &Path,
        options: &RootOptions,
        on_candidate: OnCandidate<'_>,
        cancel: &CancellationToken,
    ) -> FinderResult<()> {
        if !root.is_dir() {
            return Err(FinderError::root_not_found(root));
        }

        let (tx, mut rx) = mpsc::channel(WALK_CHANNEL_CAPACITY);
        let root_buf = root.to_path_buf();
        let options = options.clone();
        let walk_cancel = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let walker = build_walker(&root_buf, &options)?;
            match walk_into(walker, &root_buf, &tx, &walk_cancel) {
                Some(e) => Err(FinderError::from(e)),
                None => Ok(()),
            }
        });

        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                next = rx.recv() => match next {
                    Some(candidate) => on_candidate(candidate),
                    None => break,
                },
            }
        }

        // Unblocks a walker waiting on a full channel.
        drop(rx);
        handle.await?
    }
}

fn build_walker(root: &Path, options: &RootOptions) -> FinderResult<Walk> {
    let honor_ignore = options.honors_git_ignore();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(honor_ignore)
        .ignore(honor_ignore)
        .parents(honor_ignore)
        .git_ignore(honor_ignore)
        .git_global(honor_ignore)
        .git_exclude(honor_ignore)
        .overrides(build_overrides(root, options)?)
        .sort_by_file_name(|a, b| a.cmp(b));

    Ok(builder.build())
}

fn build_overrides(root: &Path, options: &RootOptions) -> FinderResult<Override> {
    let mut overrides = OverrideBuilder::new(root);

    for pattern in options.include_patterns.iter().filter(|p| !p.is_empty()) {
        overrides.add(pattern)?;
    }
    for pattern in options.exclude_patterns.iter().filter(|p| !p.is_empty()) {
        overrides.add(&format!("!{pattern}"))?;
    }

    Ok(overrides.build()?)
}

/// Sends every file under `root` as a relative path.
///
/// Unreadable entries are skipped so the rest of the tree is still listed;
/// the first such error is returned afterwards and fails the root, the same
/// way ripgrep's stderr does.
fn walk_into(
    walker: Walk,
    root: &Path,
    tx: &mpsc::Sender<String>,
    cancel: &CancellationToken,
) -> Option<ignore::Error> {
    let mut first_error = None;

    for entry in walker {
        if cancel.is_cancelled() {
            return None;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Error walking directory: {}", e);
                first_error.get_or_insert(e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };

        if tx
            .blocking_send(relative.to_string_lossy().into_owned())
            .is_err()
        {
            return None;
        }
    }

    first_error
}
