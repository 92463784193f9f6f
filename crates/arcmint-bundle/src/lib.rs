//! ARC3 token-metadata bundle builder.
//!
//! Given a name, a description, and an ordered property map, the builder
//! stages a two-file bundle on local storage, links `metadata.json` to
//! `properties.json` by SHA-256 integrity hash, publishes the staged
//! directory to a content-addressed store, and returns the content
//! identifier of the bundle root.
//!
//! # Invariant
//!
//! The metadata file is never written, and publication never happens,
//! before the properties file exists on disk and its hash has been
//! computed over its final bytes. The recorded hash always matches the
//! published bytes.
//!
//! # Example
//!
//! ```no_run
//! use arcmint_bundle::AssetBuilder;
//! use arcmint_store::IpfsClient;
//! use serde_json::{json, Map};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let store = IpfsClient::connect()?;
//! let builder = AssetBuilder::new(store);
//!
//! let mut properties = Map::new();
//! properties.insert("color".into(), json!("red"));
//!
//! let cid = builder
//!     .build_asset("My Asset", "A red asset", &properties, false)
//!     .await?;
//! println!("published as {cid}");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod digest;
pub mod error;
pub mod metadata;
pub mod staging;

// Convenience re-exports
pub use builder::AssetBuilder;
pub use error::BuildError;
pub use metadata::{TokenMetadata, METADATA_FILE_NAME, PROPERTIES_FILE_NAME};
pub use staging::StagingDir;

// Re-export the store seam so callers can wire a builder from one crate.
pub use arcmint_store::{AddedEntry, ContentStore, StoreError};
