//! Drive file tree
//!
//! An ordered, named, multiway tree stored in an arena. Folders own their
//! children through handle lists; every node keeps a non-owning handle to its
//! folder so that paths are always derived from the parent chain rather than
//! stored. The root is slot zero, has an empty name, and never has a parent.

pub mod node;
mod ops;
pub mod path;

pub use node::{Branch, BranchKind, FileMetadata, NodeId, TreeFolder};
pub use path::{extname, DrivePath};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    branch: Option<Branch>,
}

/// Arena-backed file tree
#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    /// Indices of vacant slots, reused before the arena grows
    vacant: Vec<usize>,
    live: usize,
    /// Bumped on every structural or metadata change
    revision: u64,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    const ROOT: NodeId = NodeId {
        index: 0,
        generation: 0,
    };

    /// Create a tree holding only an empty root folder
    pub fn new() -> Self {
        Tree {
            slots: vec![Slot {
                generation: 0,
                branch: Some(Branch::folder("")),
            }],
            vacant: Vec::new(),
            live: 1,
            revision: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: NodeId) -> Option<&Branch> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.branch.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Branch> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.branch.as_mut())
    }

    /// Direct children of a folder; empty for files and stale handles
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(Branch::as_folder)
            .map(TreeFolder::children)
            .unwrap_or(&[])
    }

    /// Look up a direct child by name
    pub fn child(&self, folder: NodeId, name: &str) -> Option<NodeId> {
        self.children(folder)
            .iter()
            .copied()
            .find(|id| self.get(*id).map(|b| b.name == name).unwrap_or(false))
    }

    /// Root-to-node path, computed by walking parent handles
    pub fn path(&self, id: NodeId) -> DrivePath {
        let mut segments = Vec::new();
        let mut cursor = self.get(id);
        while let Some(branch) = cursor {
            let Some(parent) = branch.parent else { break };
            segments.push(branch.name.clone());
            cursor = self.get(parent);
        }
        segments.reverse();
        DrivePath::from_segments(segments)
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.children(Self::ROOT).is_empty()
    }

    /// Number of live nodes, root included
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Depth-first pre-order walk below `id`, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// All files with their paths, in depth-first order
    pub fn files(&self) -> impl Iterator<Item = (DrivePath, &FileMetadata)> + '_ {
        self.descendants(Self::ROOT).into_iter().filter_map(move |id| {
            self.get(id)
                .and_then(Branch::as_file)
                .map(|file| (self.path(id), file))
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn alloc(&mut self, branch: Branch) -> NodeId {
        self.live += 1;
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index];
            slot.branch = Some(branch);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            branch: Some(branch),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Attach a detached node to `folder`, optionally at a given position
    fn attach(&mut self, folder: NodeId, child: NodeId, position: Option<usize>) {
        if let Some(branch) = self.get_mut(child) {
            branch.parent = Some(folder);
        }
        if let Some(Branch {
            kind: BranchKind::Folder(contents),
            ..
        }) = self.get_mut(folder)
        {
            match position {
                Some(idx) if idx <= contents.children.len() => {
                    contents.children.insert(idx, child)
                }
                _ => contents.children.push(child),
            }
        }
        self.touch();
    }

    /// Unlink a node from its folder, returning its former position
    fn detach(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.get_mut(id)?.parent.take()?;
        let position = match self.get_mut(parent) {
            Some(Branch {
                kind: BranchKind::Folder(contents),
                ..
            }) => {
                let idx = contents.children.iter().position(|c| *c == id);
                if let Some(idx) = idx {
                    contents.children.remove(idx);
                }
                idx
            }
            _ => None,
        };
        self.touch();
        position
    }

    /// Release the slots of a detached subtree
    fn free(&mut self, id: NodeId) {
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            let Some(slot) = self.slots.get_mut(node.index) else { continue };
            if slot.generation != node.generation || slot.branch.is_none() {
                continue;
            }
            slot.branch = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.vacant.push(node.index);
            self.live -= 1;
        }
    }

    fn structurally_equal(&self, other: &Tree) -> bool {
        let mut pending = vec![(Self::ROOT, Self::ROOT)];
        while let Some((a, b)) = pending.pop() {
            let (Some(left), Some(right)) = (self.get(a), other.get(b)) else {
                return false;
            };
            if left.name != right.name {
                return false;
            }
            match (&left.kind, &right.kind) {
                (BranchKind::File(l), BranchKind::File(r)) if l == r => {}
                (BranchKind::Folder(l), BranchKind::Folder(r))
                    if l.children.len() == r.children.len() =>
                {
                    pending.extend(l.children.iter().copied().zip(r.children.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Structural equality: same names, kinds, order, and file metadata at every path.
impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(other)
    }
}

impl Eq for Tree {}
