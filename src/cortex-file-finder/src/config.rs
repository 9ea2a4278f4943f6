//! Process-wide configuration for the file finder.

use std::path::PathBuf;

/// Environment variable overriding the ripgrep binary location.
pub const RG_PATH_ENV: &str = "CORTEX_RG_PATH";

/// Program name used when ripgrep cannot be located on `PATH`.
const DEFAULT_RG_PROGRAM: &str = "rg";

/// Which candidate listing backend the finder uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Spawn ripgrep once per root.
    #[default]
    Ripgrep,

    /// Walk the tree in-process with the `ignore` crate.
    Walk,
}

/// Configuration fixed for the lifetime of a [`crate::FileFinder`].
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Location of the ripgrep binary.
    pub rg_path: PathBuf,

    /// Listing backend.
    pub backend: Backend,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            rg_path: PathBuf::from(DEFAULT_RG_PROGRAM),
            backend: Backend::default(),
        }
    }
}

impl FinderConfig {
    /// Resolves the configuration from the environment.
    ///
    /// `CORTEX_RG_PATH` wins, then the first `rg` on `PATH`, then the bare
    /// program name (left for the OS to resolve at spawn time).
    pub fn from_env() -> Self {
        let rg_path = std::env::var_os(RG_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .or_else(|| which::which(DEFAULT_RG_PROGRAM).ok())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RG_PROGRAM));

        tracing::debug!(rg_path = %rg_path.display(), "Resolved ripgrep location");

        Self {
            rg_path,
            ..Default::default()
        }
    }

    /// Creates a builder for constructing a configuration.
    pub fn builder() -> FinderConfigBuilder {
        FinderConfigBuilder::default()
    }
}

/// Builder for creating `FinderConfig` instances.
#[derive(Debug, Default)]
pub struct FinderConfigBuilder {
    config: FinderConfig,
}

impl FinderConfigBuilder {
    /// Sets the ripgrep binary location.
    pub fn rg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rg_path = path.into();
        self
    }

    /// Sets the listing backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> FinderConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FinderConfig::default();
        assert_eq!(config.rg_path, PathBuf::from("rg"));
        assert_eq!(config.backend, Backend::Ripgrep);
    }

    #[test]
    fn test_config_builder() {
        let config = FinderConfig::builder()
            .rg_path("/opt/bin/rg")
            .backend(Backend::Walk)
            .build();

        assert_eq!(config.rg_path, PathBuf::from("/opt/bin/rg"));
        assert_eq!(config.backend, Backend::Walk);
    }

    #[test]
    fn test_from_env_always_yields_a_program() {
        let config = FinderConfig::from_env();
        assert!(!config.rg_path.as_os_str().is_empty());
    }
}
