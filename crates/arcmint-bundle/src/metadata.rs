//! The fixed token-metadata schema and bundle serialization.
//!
//! Both bundle members are serialized as human-readable JSON with 4-space
//! indentation; the metadata shape must be reproduced exactly for
//! compatibility with ARC3 consumers.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;

/// File name of the properties document inside the bundle.
pub const PROPERTIES_FILE_NAME: &str = "properties.json";

/// File name of the metadata document inside the bundle.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Declared media type of the properties document.
pub const PROPERTIES_MIMETYPE: &str = "application/json";

const METADATA_TITLE: &str = "Token Metadata";
const METADATA_TYPE: &str = "object";

/// Top-level metadata document referencing the properties file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenMetadata {
    /// Always `Token Metadata`.
    pub title: String,
    /// Always `object`.
    #[serde(rename = "type")]
    pub type_: String,
    pub properties: MetadataProperties,
}

/// The `properties` object of the metadata document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataProperties {
    pub name: String,
    pub description: String,
    /// Name of the properties file within the bundle.
    pub external_url: String,
    /// Lowercase hex SHA-256 of the properties file's raw bytes.
    pub external_url_integrity: String,
    /// Declared media type of the properties file.
    pub external_url_mimetype: String,
}

impl TokenMetadata {
    /// Metadata linking the bundle's properties file by integrity hash.
    pub fn new(name: &str, description: &str, properties_hash_hex: &str) -> Self {
        Self {
            title: METADATA_TITLE.into(),
            type_: METADATA_TYPE.into(),
            properties: MetadataProperties {
                name: name.into(),
                description: description.into(),
                external_url: PROPERTIES_FILE_NAME.into(),
                external_url_integrity: properties_hash_hex.into(),
                external_url_mimetype: PROPERTIES_MIMETYPE.into(),
            },
        }
    }
}

/// Serialize a value as pretty JSON with 4-space indentation.
pub fn to_pretty_vec<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    Ok(out)
}
