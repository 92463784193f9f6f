//! The bundle construction and publication pipeline.

use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use arcmint_store::ContentStore;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::digest;
use crate::error::BuildError;
use crate::metadata::{self, TokenMetadata};
use crate::staging::StagingDir;

/// Builds two-file metadata bundles and publishes them.
///
/// The content store connection is injected at construction and held for
/// the builder's lifetime, so tests substitute a fake and production
/// callers connect once.
///
/// Builds are a linear pipeline with no internal concurrency, timeout,
/// or retry. Two builds running concurrently under the same asset name
/// race on the derived staging path; callers needing isolation give each
/// invocation its own staging root via [`AssetBuilder::with_staging_root`].
pub struct AssetBuilder<S: ContentStore> {
    store: S,
    staging_root: PathBuf,
}

impl<S: ContentStore> AssetBuilder<S> {
    /// Builder staging under the process current working directory.
    pub fn new(store: S) -> Self {
        let root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_staging_root(store, root)
    }

    /// Builder staging under an explicit root directory.
    pub fn with_staging_root(store: S, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            staging_root: root.into(),
        }
    }

    /// Stage, hash-link, and publish the bundle for one asset; returns
    /// the content identifier of the bundle root.
    ///
    /// `name` and `description` are passed through as given, empty
    /// strings included. `properties` is written to `properties.json`
    /// exactly as provided (insertion order preserved), and
    /// `metadata.json` records its SHA-256 before the staged directory
    /// is handed to the store. With `debug` set, the staged files are
    /// left on disk after publication for inspection; otherwise both
    /// files and the directory are removed.
    ///
    /// # Errors
    ///
    /// - [`BuildError::Staging`]: the directory or a member file could
    ///   not be created, written, or read
    /// - [`BuildError::Serialize`]: `properties` is not representable
    ///   as JSON
    /// - [`BuildError::Publish`]: the store rejected the submission or
    ///   was unreachable
    /// - [`BuildError::EmptyPublication`]: the store returned no root
    ///   entry
    pub async fn build_asset(
        &self,
        name: &str,
        description: &str,
        properties: &Map<String, Value>,
        debug: bool,
    ) -> Result<String, BuildError> {
        let staged = StagingDir::acquire(&self.staging_root, name)?;
        debug!(dir = %staged.path().display(), "staging directory acquired");

        let properties_bytes = metadata::to_pretty_vec(properties)?;
        write_member(&staged.properties_path(), &properties_bytes)
            .map_err(|e| BuildError::staging(staged.properties_path(), e))?;

        // Hash the re-read durable bytes, not the in-memory buffer: the
        // recorded integrity hash must match exactly what gets published.
        let properties_hash = digest::sha256_file_hex(&staged.properties_path())
            .map_err(|e| BuildError::staging(staged.properties_path(), e))?;
        debug!(sha256 = %properties_hash, "properties file hashed");

        let metadata_doc = TokenMetadata::new(name, description, &properties_hash);
        let metadata_bytes = metadata::to_pretty_vec(&metadata_doc)?;
        write_member(&staged.metadata_path(), &metadata_bytes)
            .map_err(|e| BuildError::staging(staged.metadata_path(), e))?;

        let entries = self.store.add_directory(staged.path()).await?;
        debug!(entries = entries.len(), "bundle submitted");

        // The record for the root directory is the last element.
        let cid = entries
            .last()
            .map(|root| root.cid.clone())
            .ok_or(BuildError::EmptyPublication)?;

        if !debug {
            staged.release();
        }

        info!(cid = %cid, name = %name, "bundle published");
        Ok(cid)
    }
}

/// Write a member file and flush it to durable storage.
fn write_member(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}
