//! Drive metadata read/write
//!
//! Extracts name, description, identifier, servers, and owner key from a
//! document's tags, and renders them back as singleton tags for a new template.

use crate::error::DriveError;
use crate::event::Document;
use crate::tags::is_tree_tag;
use crate::types::{tag_names, Tag};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

/// Metadata of one drive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveMetadata {
    pub name: String,
    /// Stable logical id; the drive's primary key
    pub identifier: String,
    pub description: String,
    pub servers: Vec<String>,
    /// Present only when read from a signed document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// Raw tree records, kept only until the tree is rebuilt
    #[serde(skip)]
    pub tree_tags: Vec<Tag>,
}

/// Reduce a server URL to its origin plus root path, e.g. `https://cdn.example.com/`
pub fn normalize_server(server: &str) -> Result<String, DriveError> {
    let url = Url::parse(server.trim())
        .map_err(|e| DriveError::InvalidUrl(format!("{}: {}", server, e)))?;
    Ok(url.join("/")?.to_string())
}

/// Normalize and deduplicate servers, keeping first occurrences.
/// Entries that are not URLs are dropped with a warning.
pub fn normalize_servers<I, S>(servers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for server in servers {
        match normalize_server(server.as_ref()) {
            Ok(normalized) => {
                if !out.contains(&normalized) {
                    out.push(normalized);
                }
            }
            Err(err) => warn!(server = server.as_ref(), error = %err, "Ignoring server"),
        }
    }
    out
}

/// Parse drive metadata from a document.
///
/// A missing or empty identifier is fatal. The name falls back to
/// `held_identifier`, the identifier the drive had before this document,
/// and the description to the empty string.
pub fn read_document(
    document: &Document,
    held_identifier: &str,
) -> Result<DriveMetadata, DriveError> {
    let identifier = match document.tag_value(tag_names::IDENTIFIER) {
        Some(identifier) if !identifier.is_empty() => identifier.to_string(),
        _ => return Err(DriveError::Malformed("missing identifier tag".to_string())),
    };
    let name = document
        .tag_value(tag_names::NAME)
        .map(str::to_string)
        .unwrap_or_else(|| held_identifier.to_string());
    let description = document
        .tag_value(tag_names::DESCRIPTION)
        .unwrap_or_default()
        .to_string();

    let servers = normalize_servers(
        document
            .tags()
            .iter()
            .filter(|tag| tag.first().map(String::as_str) == Some(tag_names::SERVER))
            .filter_map(|tag| tag.get(1))
            .filter(|value| !value.is_empty()),
    );

    let tree_tags = document
        .tags()
        .iter()
        .filter(|tag| is_tree_tag(tag))
        .cloned()
        .collect();

    Ok(DriveMetadata {
        name,
        identifier,
        description,
        servers,
        pubkey: document.pubkey().map(str::to_string),
        tree_tags,
    })
}

/// True for the singleton and server tags owned by the metadata layer
pub fn is_metadata_tag(tag: &[String]) -> bool {
    matches!(
        tag.first().map(String::as_str),
        Some(tag_names::NAME)
            | Some(tag_names::DESCRIPTION)
            | Some(tag_names::IDENTIFIER)
            | Some(tag_names::SERVER)
    )
}

/// Render metadata as `name`, `description`, `d`, then one `r` per server
pub fn metadata_tags(metadata: &DriveMetadata) -> Vec<Tag> {
    let mut tags = vec![
        vec![tag_names::NAME.to_string(), metadata.name.clone()],
        vec![tag_names::DESCRIPTION.to_string(), metadata.description.clone()],
        vec![tag_names::IDENTIFIER.to_string(), metadata.identifier.clone()],
    ];
    for server in normalize_servers(&metadata.servers) {
        tags.push(vec![tag_names::SERVER.to_string(), server]);
    }
    tags
}
