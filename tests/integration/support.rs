//! Test doubles for drive collaborators

use async_trait::async_trait;
use blossom_drive::remote::{BlobClient, Publisher, Signer};
use blossom_drive::types::{Tag, DRIVE_KIND};
use blossom_drive::{DriveError, EventTemplate, SignedEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn tag(parts: &[&str]) -> Tag {
    parts.iter().map(|s| s.to_string()).collect()
}

pub fn template(created_at: u64, tags: Vec<Tag>) -> EventTemplate {
    EventTemplate {
        kind: DRIVE_KIND,
        content: String::new(),
        created_at,
        tags,
    }
}

/// Signs by stamping a fixed key; fails on demand
#[derive(Default)]
pub struct FakeSigner {
    pub fail: bool,
    pub calls: AtomicUsize,
}

#[async_trait]
impl Signer for FakeSigner {
    async fn sign(&self, template: EventTemplate) -> Result<SignedEvent, DriveError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DriveError::Signer("user declined".to_string()));
        }
        Ok(SignedEvent {
            id: format!("event-{}", n),
            pubkey: "f".repeat(64),
            sig: "0".repeat(128),
            kind: template.kind,
            content: template.content,
            created_at: template.created_at,
            tags: template.tags,
        })
    }
}

/// Records published events; fails on demand
#[derive(Default)]
pub struct RecordingPublisher {
    pub fail: bool,
    pub published: Mutex<Vec<SignedEvent>>,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, event: &SignedEvent) -> Result<(), DriveError> {
        if self.fail {
            return Err(DriveError::Publisher("no relays reachable".to_string()));
        }
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Serves blobs from an in-memory map keyed by server; records every request
#[derive(Default)]
pub struct MapBlobClient {
    pub blobs: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl MapBlobClient {
    pub fn serving(server: &str, bytes: &[u8]) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(server.to_string(), bytes.to_vec());
        Self {
            blobs,
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BlobClient for MapBlobClient {
    async fn get_blob(&self, server: &str, sha256: &str) -> Result<Vec<u8>, DriveError> {
        self.requests.lock().unwrap().push(server.to_string());
        self.blobs
            .get(server)
            .cloned()
            .ok_or_else(|| DriveError::Blob(format!("{} not found on {}", sha256, server)))
    }
}
