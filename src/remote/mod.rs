//! Collaborator seams
//!
//! The drive core never signs, publishes, or transfers bytes itself. Those
//! concerns sit behind the traits here so callers can plug in their own key
//! management, relay pool, and blob mirrors.

pub mod http;
pub mod mime;

use crate::error::DriveError;
use crate::event::{EventTemplate, SignedEvent};
use async_trait::async_trait;

pub use http::HttpBlobClient;
pub use mime::MimeExtensionLookup;

/// Turns a template into a signed document
#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, template: EventTemplate) -> Result<SignedEvent, DriveError>;
}

/// Broadcasts a signed document
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, event: &SignedEvent) -> Result<(), DriveError>;
}

/// Fetches blob bytes by content hash from one server
#[async_trait]
pub trait BlobClient: Send + Sync {
    async fn get_blob(&self, server: &str, sha256: &str) -> Result<Vec<u8>, DriveError>;
}

/// Maps a MIME type to a file extension including the dot
pub trait ExtensionLookup: Send + Sync {
    fn extension(&self, mime_type: &str) -> Option<String>;
}

/// Encodes a human-readable drive address
pub trait AddressEncoder: Send + Sync {
    fn encode(&self, identifier: &str, pubkey: &str, kind: u32) -> String;
}

/// Signer for drives opened without a key
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlySigner;

#[async_trait]
impl Signer for ReadOnlySigner {
    async fn sign(&self, _template: EventTemplate) -> Result<SignedEvent, DriveError> {
        Err(DriveError::Signer("drive is read-only".to_string()))
    }
}

/// Publisher for drives opened without a relay connection
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnlyPublisher;

#[async_trait]
impl Publisher for ReadOnlyPublisher {
    async fn publish(&self, _event: &SignedEvent) -> Result<(), DriveError> {
        Err(DriveError::Publisher("drive is read-only".to_string()))
    }
}
