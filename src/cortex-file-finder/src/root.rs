//! Search roots and candidate resolution.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::error::{FinderError, FinderResult};

/// A root directory parsed from its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    identifier: String,
    path: PathBuf,
}

impl SearchRoot {
    /// Parses a root identifier: a `file://` URI or an absolute path.
    pub fn parse(identifier: &str) -> FinderResult<Self> {
        let path = match Url::parse(identifier) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|()| FinderError::invalid_root(identifier))?,
            _ if Path::new(identifier).is_absolute() => PathBuf::from(identifier),
            _ => return Err(FinderError::invalid_root(identifier)),
        };

        Ok(Self {
            identifier: identifier.to_string(),
            path,
        })
    }

    /// The identifier this root was parsed from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The root's filesystem location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves a relative candidate into an absolute `file://` identifier.
    ///
    /// Returns `None` for blank lines. The same candidate always resolves
    /// to the same identifier, whichever spelling of the root was used.
    pub fn resolve(&self, candidate: &str) -> Option<String> {
        let candidate = candidate.trim_end_matches(['\r', '\n']);
        if candidate.trim().is_empty() {
            return None;
        }

        let joined: PathBuf = self
            .path
            .join(candidate)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        Url::from_file_path(&joined).ok().map(String::from)
    }
}
