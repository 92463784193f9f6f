//! HTTP client for the Kubo (go-ipfs) RPC API.
//!
//! Directory ingestion uses a single `POST /api/v0/add` with one
//! multipart part per entry: an `application/x-directory` part for each
//! directory, then one part per contained file, part filenames carrying
//! the directory-relative path. The daemon answers with one JSON object
//! per line and emits the record for the root directory last.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::{AddedEntry, ContentStore};

/// API endpoint of a local Kubo daemon with default configuration.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5001";

/// User agent for API requests.
const USER_AGENT_VALUE: &str = concat!("arcmint-store/", env!("CARGO_PKG_VERSION"));

/// Media type Kubo uses to mark directory parts.
const DIRECTORY_MIMETYPE: &str = "application/x-directory";

/// Client for the add endpoint of the IPFS HTTP RPC API.
#[derive(Debug, Clone)]
pub struct IpfsClient {
    /// HTTP client.
    client: reqwest::Client,

    /// Base URL of the daemon API, no trailing slash.
    api_base: String,
}

/// One line of the add response stream.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponseLine {
    name: String,
    hash: String,
    /// Kubo reports sizes as decimal strings.
    #[serde(default)]
    size: Option<String>,
}

impl IpfsClient {
    /// Connect to the local daemon at [`DEFAULT_API_BASE`].
    pub fn connect() -> StoreResult<Self> {
        Self::new(DEFAULT_API_BASE)
    }

    /// Client for an explicit API endpoint, e.g. `http://127.0.0.1:5001`.
    pub fn new(api_base: impl Into<String>) -> StoreResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        // No request timeout: the add round-trip has no internal deadline,
        // callers impose one externally.
        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| StoreError::Unreachable {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// The configured API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl ContentStore for IpfsClient {
    async fn add_directory(&self, dir: &Path) -> StoreResult<Vec<AddedEntry>> {
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

        let form = directory_form(dir, root_name)?;

        let url = format!("{}/api/v0/add?pin=true&progress=false", self.api_base);
        debug!(url = %url, root = %root_name, "submitting directory to IPFS");

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::InvalidResponse {
                message: format!("failed to read add response: {}", e),
            })?;

        let entries = parse_add_response(&body)?;
        debug!(entries = entries.len(), "add response parsed");
        Ok(entries)
    }
}

/// Multipart form for `dir` and everything under it.
///
/// Children are submitted in name order so repeated submissions of the
/// same directory produce the same form.
fn directory_form(dir: &Path, root_name: &str) -> StoreResult<Form> {
    append_dir(Form::new(), dir, root_name)
}

fn append_dir(form: Form, fs_path: &Path, submit_path: &str) -> StoreResult<Form> {
    let dir_part = Part::bytes(Vec::new())
        .file_name(submit_path.to_string())
        .mime_str(DIRECTORY_MIMETYPE)
        .map_err(|e| StoreError::Io {
            message: format!("failed to build directory part: {}", e),
        })?;
    let mut form = form.part("file", dir_part);

    let mut children: Vec<_> = fs::read_dir(fs_path)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    children.sort();

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
            form = append_dir(form, &child, &child_submit)?;
        } else {
            let bytes = fs::read(&child)?;
            let file_part = Part::bytes(bytes)
                .file_name(child_submit)
                .mime_str("application/octet-stream")
                .map_err(|e| StoreError::Io {
                    message: format!("failed to build file part: {}", e),
                })?;
            form = form.part("file", file_part);
        }
    }

    Ok(form)
}

/// Parse the newline-delimited JSON records of an add response.
fn parse_add_response(body: &str) -> StoreResult<Vec<AddedEntry>> {
    let mut entries = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: AddResponseLine =
            serde_json::from_str(line).map_err(|e| StoreError::InvalidResponse {
                message: format!("malformed add record: {}", e),
            })?;
        entries.push(AddedEntry {
            name: record.name,
            cid: record.hash,
            size: record.size.as_deref().and_then(|s| s.parse().ok()),
        });
    }
    Ok(entries)
}
