//! Content-addressed storage collaborators for arcmint.
//!
//! The bundle builder hands a staged local directory to a [`ContentStore`]
//! and keeps only the content identifier of the directory root. The store
//! connection is a configuration-scoped dependency: it is constructed once
//! and injected, so tests substitute [`MemoryContentStore`] for the real
//! daemon.
//!
//! # Implementations
//!
//! - [`IpfsClient`]: the Kubo (go-ipfs) HTTP RPC API (`/api/v0/add`)
//! - [`MemoryContentStore`]: in-memory fake with deterministic identifiers

pub mod error;
pub mod ipfs;
pub mod memory;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::{StoreError, StoreResult};
pub use ipfs::IpfsClient;
pub use memory::MemoryContentStore;

/// One record per ingested file or directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddedEntry {
    /// Path of the entry as submitted, root directory name included.
    pub name: String,
    /// Content identifier assigned by the storage network.
    pub cid: String,
    /// Size in bytes, when the backend reports one.
    pub size: Option<u64>,
}

/// The content store seam.
///
/// Implementations ingest a local directory recursively and return one
/// record for every contained file and directory. The record for the
/// directory root is the LAST element of the returned sequence.
///
/// The ingest call is a single round-trip with no internal timeout or
/// retry; callers needing a deadline wrap the call (for example with
/// `tokio::time::timeout`).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Ingest `dir` and everything under it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Unreachable`] if the network transport fails
    /// - [`StoreError::Rejected`] if the store refuses the submission
    /// - [`StoreError::InvalidResponse`] if the result cannot be parsed
    /// - [`StoreError::Io`] if the local directory cannot be read
    async fn add_directory(&self, dir: &Path) -> StoreResult<Vec<AddedEntry>>;
}
