//! Core types shared across the drive crate.

/// Tag: one ordered tuple of strings inside a document
pub type Tag = Vec<String>;

/// Timestamp: document creation time in Unix seconds
pub type Timestamp = u64;

/// Kind number of drive documents
pub const DRIVE_KIND: u32 = 30563;

/// Tag names used by the drive encoding
pub mod tag_names {
    pub const IDENTIFIER: &str = "d";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const SERVER: &str = "r";
    pub const FILE: &str = "x";
    pub const FOLDER: &str = "folder";
}

/// Current Unix time in seconds
pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp().max(0) as Timestamp
}
