//! IPFS HTTP client tests against a mock daemon.

use std::fs;
use std::path::PathBuf;

use arcmint_store::{ContentStore, IpfsClient, StoreError};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A staged two-file bundle directory under a temp root.
fn staged_bundle() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("My_Asset_ipfs");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("properties.json"), b"{\n    \"color\": \"red\"\n}").unwrap();
    fs::write(dir.join("metadata.json"), b"{}").unwrap();
    (tmp, dir)
}

#[tokio::test]
async fn test_add_directory_returns_entries_root_last() {
    let server = MockServer::start().await;
    let body = concat!(
        "{\"Name\":\"My_Asset_ipfs/metadata.json\",\"Hash\":\"QmMeta\",\"Size\":\"2\"}\n",
        "{\"Name\":\"My_Asset_ipfs/properties.json\",\"Hash\":\"QmProp\",\"Size\":\"24\"}\n",
        "{\"Name\":\"My_Asset_ipfs\",\"Hash\":\"QmRoot\",\"Size\":\"130\"}\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .and(query_param("pin", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let (_tmp, dir) = staged_bundle();
    let client = IpfsClient::new(server.uri()).unwrap();
    let entries = client.add_directory(&dir).await.unwrap();

    assert_eq!(entries.len(), 3);
    let root = entries.last().unwrap();
    assert_eq!(root.name, "My_Asset_ipfs");
    assert_eq!(root.cid, "QmRoot");
    assert_eq!(root.size, Some(130));
}

#[tokio::test]
async fn test_add_directory_rejected_maps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let (_tmp, dir) = staged_bundle();
    let client = IpfsClient::new(server.uri()).unwrap();
    let err = client.add_directory(&dir).await.unwrap_err();

    match err {
        StoreError::Rejected { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("internal error"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_add_directory_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v0/add"))
        .respond_with(ResponseTemplate::new(200).set_body_string("this is not ndjson"))
        .mount(&server)
        .await;

    let (_tmp, dir) = staged_bundle();
    let client = IpfsClient::new(server.uri()).unwrap();
    let err = client.add_directory(&dir).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_add_directory_daemon_unreachable() {
    // Nothing listens on port 1.
    let (_tmp, dir) = staged_bundle();
    let client = IpfsClient::new("http://127.0.0.1:1").unwrap();
    let err = client.add_directory(&dir).await.unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_add_directory_requires_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let file = tmp.path().join("not_a_dir.json");
    fs::write(&file, b"{}").unwrap();

    let client = IpfsClient::new("http://127.0.0.1:5001").unwrap();
    let err = client.add_directory(&file).await.unwrap_err();
    assert!(matches!(err, StoreError::Io { .. }));
}
