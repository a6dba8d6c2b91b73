//! Tree node types

use serde::{Deserialize, Serialize};

/// Handle to a node inside a [`Tree`](super::Tree) arena.
///
/// Freed slots are recycled under a new generation, so a handle to a removed
/// node resolves to nothing instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// Content-addressing metadata carried by a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub sha256: String,
    pub size: u64,
    /// MIME type; may be empty
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

impl FileMetadata {
    pub fn new(sha256: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            sha256: sha256.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// Folder contents: child handles in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeFolder {
    pub(crate) children: Vec<NodeId>,
}

impl TreeFolder {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }
}

/// Node variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    Folder(TreeFolder),
    File(FileMetadata),
}

/// A named node with a non-owning link to its folder
#[derive(Debug, Clone)]
pub struct Branch {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: BranchKind,
}

impl Branch {
    pub(crate) fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: BranchKind::Folder(TreeFolder::default()),
        }
    }

    pub(crate) fn file(name: impl Into<String>, metadata: FileMetadata) -> Self {
        Self {
            name: name.into(),
            parent: None,
            kind: BranchKind::File(metadata),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &BranchKind {
        &self.kind
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, BranchKind::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&TreeFolder> {
        match &self.kind {
            BranchKind::Folder(folder) => Some(folder),
            BranchKind::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileMetadata> {
        match &self.kind {
            BranchKind::File(file) => Some(file),
            BranchKind::Folder(_) => None,
        }
    }
}
