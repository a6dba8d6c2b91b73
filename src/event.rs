//! Drive documents
//!
//! A drive is persisted as one versioned, taggable document. Before signing it
//! is an [`EventTemplate`]; after signing it is a [`SignedEvent`] stamped with
//! the owner's key. Both share the same tag list and logical timestamp.

use crate::types::{Tag, Timestamp};
use serde::{Deserialize, Serialize};

/// Unsigned document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub kind: u32,
    #[serde(default)]
    pub content: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Signed, immutable document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEvent {
    pub id: String,
    pub pubkey: String,
    pub sig: String,
    pub kind: u32,
    #[serde(default)]
    pub content: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A document accepted by a drive, signed or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Signed(SignedEvent),
    Template(EventTemplate),
}

impl Document {
    pub fn kind(&self) -> u32 {
        match self {
            Document::Signed(event) => event.kind,
            Document::Template(event) => event.kind,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            Document::Signed(event) => event.created_at,
            Document::Template(event) => event.created_at,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Document::Signed(event) => &event.content,
            Document::Template(event) => &event.content,
        }
    }

    pub fn tags(&self) -> &[Tag] {
        match self {
            Document::Signed(event) => &event.tags,
            Document::Template(event) => &event.tags,
        }
    }

    /// Owner key; only signed documents carry one
    pub fn pubkey(&self) -> Option<&str> {
        match self {
            Document::Signed(event) => Some(&event.pubkey),
            Document::Template(_) => None,
        }
    }

    /// First value of the first tag named `name`
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags()
            .iter()
            .find(|tag| tag.first().map(String::as_str) == Some(name))
            .and_then(|tag| tag.get(1))
            .map(String::as_str)
    }
}

impl From<SignedEvent> for Document {
    fn from(event: SignedEvent) -> Self {
        Document::Signed(event)
    }
}

impl From<EventTemplate> for Document {
    fn from(event: EventTemplate) -> Self {
        Document::Template(event)
    }
}
