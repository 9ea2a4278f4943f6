//! Candidate listing backends.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::{Backend, FinderConfig};
use crate::error::FinderResult;
use crate::options::RootOptions;
use crate::ripgrep::RipgrepProvider;
use crate::walk::WalkProvider;

/// Callback receiving each candidate path relative to the root.
pub type OnCandidate<'a> = &'a mut (dyn FnMut(String) + Send);

/// Lists the files under one root, honoring its filtering rules.
#[async_trait]
pub trait FileProvider: Send + Sync + std::fmt::Debug {
    /// Short backend name used in logs.
    fn name(&self) -> &str;

    /// Reports every file under `root` to `on_candidate`, in discovery order.
    ///
    /// Once `cancel` fires no further candidates are reported and the call
    /// returns `Ok(())` after releasing its resources.
    async fn list_files(
        &self,
        root: &Path,
        options: &RootOptions,
        on_candidate: OnCandidate<'_>,
        cancel: &CancellationToken,
    ) -> FinderResult<()>;
}

/// Creates the provider selected by `config`.
pub fn provider_for(config: &FinderConfig) -> Arc<dyn FileProvider> {
    match config.backend {
        Backend::Ripgrep => Arc::new(RipgrepProvider::new(config.rg_path.clone())),
        Backend::Walk => Arc::new(WalkProvider::new()),
    }
}
