//! In-memory content store for tests.
//!
//! Content identifiers are deterministic: a file's cid is derived from the
//! SHA-256 of its bytes, a directory's cid from the chain of its children's
//! cids in submission order. Same bytes in, same identifiers out, so tests
//! can assert on addressing behavior without a daemon.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use sha2::{Digest, Sha256};

use crate::error::{StoreError, StoreResult};
use crate::{AddedEntry, ContentStore};

/// Content store fake that records everything it ingests.
#[derive(Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Submitted-path -> file bytes, for every ingested file.
    published: RwLock<BTreeMap<String, Vec<u8>>>,

    /// Number of completed `add_directory` calls.
    publish_count: RwLock<usize>,

    /// When set, the next `add_directory` fails as unreachable.
    fail_next: RwLock<bool>,
}

impl MemoryContentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `add_directory` call fail with
    /// [`StoreError::Unreachable`].
    pub fn fail_next(&self) {
        *self.inner.fail_next.write() = true;
    }

    /// Bytes of an ingested file, keyed by its submitted path
    /// (e.g. `My_Asset_ipfs/properties.json`).
    pub fn published(&self, name: &str) -> Option<Vec<u8>> {
        self.inner.published.read().get(name).cloned()
    }

    /// Number of completed ingest calls.
    pub fn publish_count(&self) -> usize {
        *self.inner.publish_count.read()
    }

    fn ingest_dir(
        &self,
        fs_path: &Path,
        submit_path: &str,
        entries: &mut Vec<AddedEntry>,
    ) -> StoreResult<String> {
        let mut children: Vec<_> = fs::read_dir(fs_path)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .collect();
        children.sort();

        let mut child_cids = Vec::new();
        for child in children {
            let child_name = child
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| StoreError::Io {
                    message: format!("entry has no usable name: {}", child.display()),
                })?
                .to_string();
            let child_submit = format!("{}/{}", submit_path, child_name);

            if child.is_dir() {
                let cid = self.ingest_dir(&child, &child_submit, entries)?;
                child_cids.push(cid);
            } else {
                let bytes = fs::read(&child)?;
                let cid = content_cid(&bytes);
                let size = bytes.len() as u64;
                self.inner
                    .published
                    .write()
                    .insert(child_submit.clone(), bytes);
                entries.push(AddedEntry {
                    name: child_submit,
                    cid: cid.clone(),
                    size: Some(size),
                });
                child_cids.push(cid);
            }
        }

        let cid = directory_cid(&child_cids);
        entries.push(AddedEntry {
            name: submit_path.to_string(),
            cid: cid.clone(),
            size: None,
        });
        Ok(cid)
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn add_directory(&self, dir: &Path) -> StoreResult<Vec<AddedEntry>> {
        if std::mem::take(&mut *self.inner.fail_next.write()) {
            return Err(StoreError::Unreachable {
                message: "injected failure: daemon unreachable".into(),
            });
        }
        if !dir.is_dir() {
            return Err(StoreError::Io {
                message: format!("not a directory: {}", dir.display()),
            });
        }
        let root_name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::Io {
                message: format!("directory has no usable name: {}", dir.display()),
            })?;

        let mut entries = Vec::new();
        self.ingest_dir(dir, root_name, &mut entries)?;
        *self.inner.publish_count.write() += 1;
        Ok(entries)
    }
}

/// Cid of a file: SHA-256 over its raw bytes.
fn content_cid(bytes: &[u8]) -> String {
    format!("sha256:{}", hex::encode(Sha256::digest(bytes)))
}

/// Cid of a directory: SHA-256 chain over its children's cids, in order.
fn directory_cid(child_cids: &[String]) -> String {
    let mut hasher = Sha256::new();
    for cid in child_cids {
        hasher.update(cid.as_bytes());
        hasher.update(b"\n");
    }
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
