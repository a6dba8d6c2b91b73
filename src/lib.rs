//! Blossom Drive: File Trees in Signed Documents
//!
//! A drive is a hierarchical tree of folders and content-addressed files,
//! persisted as the tags of one versioned document. This crate keeps the tree
//! in memory, encodes it to and from flat tag records, tracks local edits,
//! and resolves file bytes from blob servers.

pub mod config;
pub mod drive;
pub mod error;
pub mod event;
pub mod logging;
pub mod metadata;
pub mod remote;
pub mod tags;
pub mod tooling;
pub mod tree;
pub mod types;

pub use drive::{DownloadedFile, Drive, DriveNotice, SubscriptionId};
pub use error::{DriveError, TreeError};
pub use event::{Document, EventTemplate, SignedEvent};
pub use metadata::DriveMetadata;
pub use tags::DecodeMode;
pub use tree::{Branch, BranchKind, DrivePath, FileMetadata, NodeId, Tree};
