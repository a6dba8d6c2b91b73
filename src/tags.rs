//! Tag Codec
//!
//! Converts a [`Tree`] into flat `x`/`folder` records and back. Folders with
//! content are implicit in their descendants' paths; only empty folders get a
//! marker record. Records of any other name are passengers that this codec
//! neither produces nor consumes.

use crate::error::DriveError;
use crate::tree::{BranchKind, DrivePath, FileMetadata, NodeId, Tree};
use crate::types::{tag_names, Tag};
use tracing::warn;

/// How decoding treats malformed tree records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Skip malformed records with a diagnostic
    #[default]
    Lenient,
    /// Abort on the first malformed record
    Strict,
}

/// True for records the codec owns
pub fn is_tree_tag(tag: &[String]) -> bool {
    matches!(
        tag.first().map(String::as_str),
        Some(tag_names::FILE) | Some(tag_names::FOLDER)
    )
}

/// Parse one `x` record into its path and file metadata
pub fn parse_file_tag(tag: &[String]) -> Result<(DrivePath, FileMetadata), DriveError> {
    let field = |idx: usize| tag.get(idx).map(String::as_str).unwrap_or("");

    let sha256 = field(1);
    if sha256.is_empty() {
        return Err(DriveError::Malformed("file record missing sha256".to_string()));
    }
    let path = DrivePath::parse(field(2));
    if path.is_root() {
        return Err(DriveError::Malformed("file record missing path".to_string()));
    }
    let size = match field(3).trim().parse::<u64>() {
        Ok(size) if size > 0 => size,
        _ => {
            return Err(DriveError::Malformed(format!(
                "file record has invalid size {:?}",
                field(3)
            )))
        }
    };

    Ok((path, FileMetadata::new(sha256, size, field(4))))
}

fn parse_folder_tag(tag: &[String]) -> Result<DrivePath, DriveError> {
    match tag.get(1) {
        Some(path) if !path.is_empty() => Ok(DrivePath::parse(path)),
        _ => Err(DriveError::Malformed("folder record missing path".to_string())),
    }
}

fn apply_tag(root: &mut Tree, tag: &[String]) -> Result<(), DriveError> {
    match tag.first().map(String::as_str) {
        Some(tag_names::FILE) => {
            let (path, metadata) = parse_file_tag(tag)?;
            root.set_file(path, metadata)?;
        }
        Some(tag_names::FOLDER) => {
            let path = parse_folder_tag(tag)?;
            root.get_folder(path, true)?;
        }
        _ => {}
    }
    Ok(())
}

/// Build a tree from a flat tag list
pub fn create_tree_from_tags(tags: &[Tag], mode: DecodeMode) -> Result<Tree, DriveError> {
    let mut tree = Tree::new();
    for tag in tags {
        if let Err(err) = apply_tag(&mut tree, tag) {
            match mode {
                DecodeMode::Strict => return Err(err),
                DecodeMode::Lenient => warn!(tag = ?tag, error = %err, "Skipping tree record"),
            }
        }
    }
    Ok(tree)
}

/// Encode a tree as flat records in depth-first order
pub fn create_tags_for_tree(tree: &Tree, keep_empty: bool) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut stack: Vec<NodeId> = tree.children(tree.root()).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let Some(branch) = tree.get(id) else { continue };
        match branch.kind() {
            BranchKind::Folder(contents) if contents.is_empty() => {
                if keep_empty {
                    tags.push(vec![tag_names::FOLDER.to_string(), tree.path(id).to_string()]);
                }
            }
            BranchKind::Folder(contents) => stack.extend(contents.children().iter().rev().copied()),
            BranchKind::File(file) => tags.push(file_tag(tree, id, file)),
        }
    }
    tags
}

fn file_tag(tree: &Tree, id: NodeId, file: &FileMetadata) -> Tag {
    vec![
        tag_names::FILE.to_string(),
        file.sha256.clone(),
        tree.path(id).to_string(),
        file.size.to_string(),
        file.mime_type.clone(),
    ]
}

/// Replace every tree record in `tags` with a fresh encoding of `tree`.
///
/// Passenger records keep their relative order; tree records are always
/// appended after them.
pub fn update_tree_in_tags(tags: &[Tag], tree: &Tree, keep_empty: bool) -> Vec<Tag> {
    tags.iter()
        .filter(|tag| !is_tree_tag(tag))
        .cloned()
        .chain(create_tags_for_tree(tree, keep_empty))
        .collect()
}
