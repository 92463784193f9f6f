//! Error taxonomy for the bundle pipeline.

use std::path::PathBuf;

use arcmint_store::StoreError;
use thiserror::Error;

/// Failures surfaced by [`crate::AssetBuilder::build_asset`].
///
/// Staging and publication are distinct variants so callers can tell
/// "fix permissions/disk space" from "check storage network
/// connectivity". None of these are recovered internally; each aborts
/// the pipeline at the point of failure and no partial result is
/// returned. Staged files are not guaranteed rolled back on failure.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The staging directory or a member file could not be created,
    /// written, read, or removed.
    #[error("staging failed at {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The property map could not be represented as JSON.
    #[error("properties are not JSON-representable: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The content store rejected the submission or never received it.
    #[error("publication failed: {0}")]
    Publish(#[from] StoreError),

    /// The publication result was empty or lacked a root entry.
    #[error("publication result lacks a root directory entry")]
    EmptyPublication,
}

impl BuildError {
    pub(crate) fn staging(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Staging {
            path: path.into(),
            source,
        }
    }

    /// True when remediation is local (filesystem, input shape) rather
    /// than the storage network.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Staging { .. } | Self::Serialize(_))
    }
}
