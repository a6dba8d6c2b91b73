//! Path resolution and mutation over a [`Tree`]

use super::node::{Branch, BranchKind, FileMetadata, NodeId};
use super::path::DrivePath;
use super::Tree;
use crate::error::TreeError;

impl Tree {
    /// Resolve an existing folder without creating anything
    pub fn find_folder(&self, path: impl Into<DrivePath>) -> Result<NodeId, TreeError> {
        let path = path.into();
        let mut folder = self.root();
        for (depth, segment) in path.segments().iter().enumerate() {
            let partial = || DrivePath::from_segments(&path.segments()[..=depth]).to_string();
            let child = self
                .child(folder, segment)
                .ok_or_else(|| TreeError::NotFound(partial()))?;
            match self.get(child) {
                Some(branch) if branch.is_folder() => folder = child,
                _ => return Err(TreeError::NotAFolder(partial())),
            }
        }
        Ok(folder)
    }

    /// Resolve the folder at `path`, materializing missing folders when `create` is set
    pub fn get_folder(
        &mut self,
        path: impl Into<DrivePath>,
        create: bool,
    ) -> Result<NodeId, TreeError> {
        let path = path.into();
        if !create {
            return self.find_folder(path);
        }
        let mut folder = self.root();
        for (depth, segment) in path.segments().iter().enumerate() {
            folder = match self.child(folder, segment) {
                Some(child) if self.get(child).map(Branch::is_folder).unwrap_or(false) => child,
                Some(_) => {
                    return Err(TreeError::NotAFolder(
                        DrivePath::from_segments(&path.segments()[..=depth]).to_string(),
                    ))
                }
                None => {
                    let created = self.alloc(Branch::folder(segment.clone()));
                    self.attach(folder, created, None);
                    created
                }
            };
        }
        Ok(folder)
    }

    /// Resolve a node of either kind without creating anything
    pub fn find_path(&self, path: impl Into<DrivePath>) -> Result<NodeId, TreeError> {
        let path = path.into();
        if path.is_root() {
            return Ok(self.root());
        }
        let parent = self.find_folder(path.dirname())?;
        self.child(parent, path.basename())
            .ok_or_else(|| TreeError::NotFound(path.to_string()))
    }

    /// Resolve a node of either kind; with `create`, a missing node becomes a folder
    pub fn get_path(
        &mut self,
        path: impl Into<DrivePath>,
        create: bool,
    ) -> Result<NodeId, TreeError> {
        let path = path.into();
        if !create {
            return self.find_path(path);
        }
        if path.is_root() {
            return Ok(self.root());
        }
        let parent = self.get_folder(path.dirname(), true)?;
        match self.child(parent, path.basename()) {
            Some(existing) => Ok(existing),
            None => self.get_folder(path, true),
        }
    }

    /// Resolve a file; fails when any segment is missing or of the wrong kind
    pub fn get_file(&self, path: impl Into<DrivePath>) -> Result<&FileMetadata, TreeError> {
        let path = path.into();
        let id = self.find_path(&path)?;
        self.get(id)
            .and_then(Branch::as_file)
            .ok_or_else(|| TreeError::NotAFile(path.to_string()))
    }

    /// Insert or overwrite the file at `path`, creating parent folders as needed
    pub fn set_file(
        &mut self,
        path: impl Into<DrivePath>,
        metadata: FileMetadata,
    ) -> Result<NodeId, TreeError> {
        let path = path.into();
        if path.is_root() {
            return Err(TreeError::IllegalTarget(path.to_string()));
        }
        // Probe first so a conflicting file leaves no half-created folders behind.
        if let Err(err @ TreeError::NotAFolder(_)) = self.find_folder(path.dirname()) {
            return Err(err);
        }
        let parent = self.get_folder(path.dirname(), true)?;
        match self.child(parent, path.basename()) {
            Some(existing) => {
                let Some(branch) = self.get_mut(existing) else {
                    return Err(TreeError::NotFound(path.to_string()));
                };
                match &mut branch.kind {
                    BranchKind::File(file) => *file = metadata,
                    BranchKind::Folder(_) => {
                        return Err(TreeError::NameConflict(path.to_string()))
                    }
                }
                self.touch();
                Ok(existing)
            }
            None => {
                let file = self.alloc(Branch::file(path.basename(), metadata));
                self.attach(parent, file, None);
                Ok(file)
            }
        }
    }

    /// Detach and drop the node at `path`; empty ancestors are kept
    pub fn remove(&mut self, path: impl Into<DrivePath>) -> Result<(), TreeError> {
        let path = path.into();
        if path.is_root() {
            return Err(TreeError::IllegalTarget(path.to_string()));
        }
        let id = self.find_path(&path)?;
        self.detach(id);
        self.free(id);
        Ok(())
    }

    /// Move the node at `src` to `dest`.
    ///
    /// An existing file at `dest` is replaced in place; an existing folder is a
    /// [`TreeError::NameConflict`]. Moving a node onto itself is a no-op. All
    /// checks run before anything is detached, so a failed move leaves the
    /// tree untouched.
    pub fn move_node(
        &mut self,
        src: impl Into<DrivePath>,
        dest: impl Into<DrivePath>,
    ) -> Result<NodeId, TreeError> {
        let src = src.into();
        let dest = dest.into();
        if src.is_root() {
            return Err(TreeError::IllegalTarget(src.to_string()));
        }
        if dest.is_root() {
            return Err(TreeError::IllegalTarget(dest.to_string()));
        }
        let node = self.find_path(&src)?;
        if src == dest {
            return Ok(node);
        }
        if dest.starts_with(&src) {
            return Err(TreeError::IllegalTarget(dest.to_string()));
        }

        let replaced = match self.find_folder(dest.dirname()) {
            Ok(parent) => match self.child(parent, dest.basename()) {
                Some(existing) if self.get(existing).map(Branch::is_folder).unwrap_or(false) => {
                    return Err(TreeError::NameConflict(dest.to_string()))
                }
                other => other,
            },
            Err(TreeError::NotFound(_)) => None,
            Err(err) => return Err(err),
        };

        self.detach(node);
        let position = match replaced {
            Some(existing) => {
                let position = self.detach(existing);
                self.free(existing);
                position
            }
            None => None,
        };
        let parent = self.get_folder(dest.dirname(), true)?;
        if let Some(branch) = self.get_mut(node) {
            branch.name = dest.basename().to_string();
        }
        self.attach(parent, node, position);
        Ok(node)
    }
}
