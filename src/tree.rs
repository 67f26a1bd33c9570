//! The public façade: `NameSpaceTree<Dt>` and `NameSpaceTree<Ft>`.
//!
//! Both variants share one traversal algorithm, one arena, and one node
//! representation (see `node` module); the marker type only gates which
//! inherent methods are visible, the way the teacher crate's `FilesystemIndex`
//! gates read vs. write operations through separate impl blocks rather than
//! separate types. A DT tree is simply an `FT` tree that never constructs a
//! file node.
//!
//! Rather than a process-wide global (the original C assignment's `root` is
//! a file-scope static), each `NameSpaceTree` is an owned value the caller
//! threads through explicitly — see the `singleton` module for an opt-in
//! process-wide wrapper for call sites that need the original's global-tree
//! ergonomics.

use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::arena::{Arena, NodeId};
use crate::checker;
use crate::error::{NamespaceTreeError, Result};
use crate::node::{ChildKind, Node};
use crate::path::Path;

/// Marker type: every node in the tree is a directory.
#[derive(Debug, Clone, Copy)]
pub struct Dt;

/// Marker type: nodes are directories or files carrying an opaque payload.
#[derive(Debug, Clone, Copy)]
pub struct Ft;

/// Capacity hints for the backing arena, analogous to the teacher's
/// `Slab::with_capacity`. Purely a performance knob; no observable behavior
/// depends on it.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Number of arena slots to pre-allocate on `init`.
    pub capacity_hint: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { capacity_hint: 16 }
    }
}

/// An in-memory, path-addressed name-space tree.
///
/// `M` is [`Dt`] or [`Ft`]; each exposes a different subset of operations via
/// its own inherent impl block. The tree starts uninitialized; [`init`]
/// transitions it to the empty, usable state, and every other operation
/// requires that transition to have already happened.
///
/// [`init`]: NameSpaceTree::init
pub struct NameSpaceTree<M> {
    arena: Arena<Node>,
    root: Option<NodeId>,
    initialized: bool,
    node_count: usize,
    config: TreeConfig,
    _mode: PhantomData<M>,
}

struct Traversal {
    deepest: Option<NodeId>,
    stopped_on_file: bool,
}

impl<M> NameSpaceTree<M> {
    /// A fresh, uninitialized tree with a default capacity hint.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// A fresh, uninitialized tree that pre-allocates per `config`.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: Arena::with_capacity_hint(config.capacity_hint),
            root: None,
            initialized: false,
            node_count: 0,
            config,
            _mode: PhantomData,
        }
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of nodes currently in the tree (0 when uninitialized or empty).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Transitions from uninitialized to initialized-and-empty.
    ///
    /// Fails with [`NamespaceTreeError::InitializationError`] if already
    /// initialized.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Err(NamespaceTreeError::InitializationError);
        }
        self.arena = Arena::with_capacity_hint(self.config.capacity_hint);
        self.root = None;
        self.node_count = 0;
        self.initialized = true;
        log::debug!("tree initialized");
        self.assert_valid();
        Ok(())
    }

    /// Frees every node and transitions back to uninitialized.
    ///
    /// Fails with [`NamespaceTreeError::InitializationError`] if not
    /// currently initialized.
    pub fn destroy(&mut self) -> Result<()> {
        if !self.initialized {
            return Err(NamespaceTreeError::InitializationError);
        }
        if let Some(root) = self.root.take() {
            let destroyed = Node::destroy(&mut self.arena, root);
            self.node_count = self.node_count.saturating_sub(destroyed);
        }
        self.initialized = false;
        log::debug!("tree destroyed");
        Ok(())
    }

    fn assert_valid(&self) {
        debug_assert!(
            checker::is_valid(self.initialized, &self.arena, self.root, self.node_count),
            "tree invariants violated"
        );
    }

    /// The shared single-path traversal algorithm: walks from the root one
    /// path segment at a time, descending through whichever child-kind list
    /// (file or directory) has a match at each level, and stopping either at
    /// the target depth, at a missing segment, or upon reaching a file node
    /// (which can have no children to descend into).
    fn traverse(&self, target: &Path) -> Result<Traversal> {
        let Some(root_id) = self.root else {
            return Ok(Traversal {
                deepest: None,
                stopped_on_file: false,
            });
        };

        let root_prefix = target.prefix(1)?;
        if self.arena[root_id].path().cmp_segments(&root_prefix) != Ordering::Equal {
            return Err(NamespaceTreeError::ConflictingPath);
        }

        let mut current = root_id;
        let depth = target.depth();
        for level in 2..=depth {
            if self.arena[current].is_file() {
                return Ok(Traversal {
                    deepest: Some(current),
                    stopped_on_file: true,
                });
            }

            let prefix = target.prefix(level)?;
            let (found_file, file_index) =
                self.arena[current].has_child(&self.arena, &prefix, ChildKind::File);
            if found_file {
                current = self.arena[current]
                    .get_child(file_index, ChildKind::File)
                    .expect("has_child reported an index that get_child rejects");
                continue;
            }

            let (found_dir, dir_index) =
                self.arena[current].has_child(&self.arena, &prefix, ChildKind::Dir);
            if found_dir {
                current = self.arena[current]
                    .get_child(dir_index, ChildKind::Dir)
                    .expect("has_child reported an index that get_child rejects");
                continue;
            }

            break;
        }

        Ok(Traversal {
            deepest: Some(current),
            stopped_on_file: false,
        })
    }

    /// Resolves `s` to the node whose path matches exactly, or a not-found
    /// error. Checks initialization first, like every other find-based
    /// operation.
    fn find_node(&self, s: &str) -> Result<NodeId> {
        if !self.initialized {
            return Err(NamespaceTreeError::InitializationError);
        }
        let target = Path::new(s)?;
        let traversal = self.traverse(&target)?;
        let Some(deepest) = traversal.deepest else {
            return Err(NamespaceTreeError::NoSuchPath(s.to_string()));
        };
        if self.arena[deepest].path().cmp_segments(&target) != Ordering::Equal {
            return Err(NamespaceTreeError::NoSuchPath(s.to_string()));
        }
        Ok(deepest)
    }

    /// Builds the chain of missing ancestor nodes from `parent` (exclusive)
    /// down to `target` (inclusive), linking each into the previous. On
    /// failure partway through, destroys whatever prefix of the chain was
    /// already constructed — rooted at the first new node, so a single
    /// `Node::destroy` call unwinds the entire partial chain and detaches it
    /// from its existing parent, leaving the tree exactly as it was before
    /// the call (§ atomicity).
    fn build_chain(
        &mut self,
        mut parent: Option<NodeId>,
        target: &Path,
        leaf_is_file: bool,
        leaf_contents: Vec<u8>,
    ) -> Result<()> {
        let start_level = parent.map_or(1, |p| self.arena[p].path().depth() + 1);
        let depth = target.depth();
        let was_empty = self.root.is_none();
        let mut first_new: Option<NodeId> = None;
        let mut created = 0usize;
        let mut leaf_contents = Some(leaf_contents);

        for level in start_level..=depth {
            let prefix = target.prefix(level)?;
            let is_leaf = level == depth;
            let is_file = is_leaf && leaf_is_file;
            let contents = if is_file {
                leaf_contents.take().unwrap_or_default()
            } else {
                Vec::new()
            };

            match Node::create(&mut self.arena, parent, prefix, is_file, contents) {
                Ok(id) => {
                    first_new.get_or_insert(id);
                    created += 1;
                    parent = Some(id);
                }
                Err(err) => {
                    if let Some(first) = first_new {
                        Node::destroy(&mut self.arena, first);
                    }
                    return Err(err);
                }
            }
        }

        if was_empty {
            self.root = first_new;
        }
        self.node_count += created;
        Ok(())
    }

    fn insert_dir_impl(&mut self, s: &str) -> Result<()> {
        if !self.initialized {
            return Err(NamespaceTreeError::InitializationError);
        }
        self.assert_valid();
        let target = Path::new(s)?;
        let traversal = self.traverse(&target)?;
        if traversal.stopped_on_file {
            return Err(NamespaceTreeError::NotADirectory(s.to_string()));
        }
        if traversal.deepest.is_none() && self.root.is_some() {
            return Err(NamespaceTreeError::ConflictingPath);
        }
        if let Some(deepest) = traversal.deepest {
            if self.arena[deepest].path().cmp_segments(&target) == Ordering::Equal {
                return Err(NamespaceTreeError::AlreadyInTree(s.to_string()));
            }
        }

        self.build_chain(traversal.deepest, &target, false, Vec::new())?;
        self.assert_valid();
        Ok(())
    }

    fn insert_file_impl(&mut self, s: &str, contents: Vec<u8>) -> Result<()> {
        if !self.initialized {
            return Err(NamespaceTreeError::InitializationError);
        }
        self.assert_valid();
        let target = Path::new(s)?;
        if target.depth() == 1 {
            // A file can never be the root: the root always exists as the
            // single top-level directory.
            return Err(NamespaceTreeError::ConflictingPath);
        }
        let traversal = self.traverse(&target)?;
        if traversal.stopped_on_file {
            return Err(NamespaceTreeError::NotADirectory(s.to_string()));
        }
        if traversal.deepest.is_none() && self.root.is_some() {
            return Err(NamespaceTreeError::ConflictingPath);
        }
        if let Some(deepest) = traversal.deepest {
            if self.arena[deepest].path().cmp_segments(&target) == Ordering::Equal {
                return Err(NamespaceTreeError::AlreadyInTree(s.to_string()));
            }
        }

        self.build_chain(traversal.deepest, &target, true, contents)?;
        self.assert_valid();
        Ok(())
    }

    fn rm_dir_impl(&mut self, s: &str) -> Result<()> {
        self.assert_valid();
        let id = self.find_node(s)?;
        if self.arena[id].is_file() {
            return Err(NamespaceTreeError::NotADirectory(s.to_string()));
        }
        let destroyed = Node::destroy(&mut self.arena, id);
        self.node_count = self.node_count.saturating_sub(destroyed);
        if Some(id) == self.root {
            self.root = None;
        }
        self.assert_valid();
        Ok(())
    }

    fn rm_file_impl(&mut self, s: &str) -> Result<()> {
        self.assert_valid();
        let id = self.find_node(s)?;
        if !self.arena[id].is_file() {
            return Err(NamespaceTreeError::NotAFile(s.to_string()));
        }
        let destroyed = Node::destroy(&mut self.arena, id);
        self.node_count = self.node_count.saturating_sub(destroyed);
        self.assert_valid();
        Ok(())
    }

    fn contains_dir_impl(&self, s: &str) -> bool {
        // Any failure (malformed path, not found, uninitialized) just means
        // "no such directory" — errors are intentionally swallowed here.
        self.find_node(s)
            .map(|id| !self.arena[id].is_file())
            .unwrap_or(false)
    }

    fn contains_file_impl(&self, s: &str) -> bool {
        self.find_node(s)
            .map(|id| self.arena[id].is_file())
            .unwrap_or(false)
    }

    fn get_file_contents_impl(&self, s: &str) -> Result<&[u8]> {
        let id = self.find_node(s)?;
        self.arena[id]
            .contents()
            .ok_or_else(|| NamespaceTreeError::NotAFile(s.to_string()))
    }

    fn replace_file_contents_impl(&mut self, s: &str, new_contents: Vec<u8>) -> Result<Vec<u8>> {
        let id = self.find_node(s)?;
        if !self.arena[id].is_file() {
            return Err(NamespaceTreeError::NotAFile(s.to_string()));
        }
        Ok(self.arena[id]
            .set_contents(new_contents)
            .unwrap_or_default())
    }

    fn stat_impl(&self, s: &str) -> Result<(bool, Option<usize>)> {
        let id = self.find_node(s)?;
        let node = &self.arena[id];
        Ok((node.is_file(), node.content_length()))
    }

    fn to_string_impl(&self, with_kind_prefix: bool) -> Option<String> {
        if !self.initialized {
            return None;
        }
        let mut lines = Vec::new();
        if let Some(root) = self.root {
            self.preorder_lines(root, with_kind_prefix, &mut lines);
        }
        let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        Some(out)
    }

    /// Pre-order dump, files before directories at each level (mirrors the
    /// original's `FT_toString`/`DT_toString` traversal order).
    fn preorder_lines(&self, id: NodeId, with_kind_prefix: bool, out: &mut Vec<String>) {
        let node = &self.arena[id];
        out.push(node.display_line(with_kind_prefix));

        for kind in [ChildKind::File, ChildKind::Dir] {
            for i in 0..node.num_children(kind) {
                let child = node
                    .get_child(i, kind)
                    .expect("index within num_children must resolve");
                self.preorder_lines(child, with_kind_prefix, out);
            }
        }
    }
}

impl<M> Default for NameSpaceTree<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl NameSpaceTree<Dt> {
    pub fn insert_dir(&mut self, path: &str) -> Result<()> {
        self.insert_dir_impl(path)
    }

    pub fn rm_dir(&mut self, path: &str) -> Result<()> {
        self.rm_dir_impl(path)
    }

    pub fn contains_dir(&self, path: &str) -> bool {
        self.contains_dir_impl(path)
    }

    /// Convenience lookup for the DT variant: confirms `path` names a node
    /// at all. Always reports `is_file = false`, since every DT node is a
    /// directory.
    pub fn stat_dir(&self, path: &str) -> Result<(bool, Option<usize>)> {
        self.find_node(path)?;
        Ok((false, None))
    }

    /// Pre-order dump of every directory path, one per line, no trailing
    /// kind prefix.
    pub fn to_string(&self) -> Option<String> {
        self.to_string_impl(false)
    }
}

impl NameSpaceTree<Ft> {
    pub fn insert_dir(&mut self, path: &str) -> Result<()> {
        self.insert_dir_impl(path)
    }

    pub fn insert_file(&mut self, path: &str, contents: Vec<u8>) -> Result<()> {
        self.insert_file_impl(path, contents)
    }

    pub fn rm_dir(&mut self, path: &str) -> Result<()> {
        self.rm_dir_impl(path)
    }

    pub fn rm_file(&mut self, path: &str) -> Result<()> {
        self.rm_file_impl(path)
    }

    pub fn contains_dir(&self, path: &str) -> bool {
        self.contains_dir_impl(path)
    }

    pub fn contains_file(&self, path: &str) -> bool {
        self.contains_file_impl(path)
    }

    pub fn get_file_contents(&self, path: &str) -> Result<&[u8]> {
        self.get_file_contents_impl(path)
    }

    /// Replaces a file's contents, returning the previous payload (empty if
    /// the file was empty).
    pub fn replace_file_contents(&mut self, path: &str, new_contents: Vec<u8>) -> Result<Vec<u8>> {
        self.replace_file_contents_impl(path, new_contents)
    }

    /// `(is_file, size_in_bytes)`; size is `None` for directories.
    pub fn stat(&self, path: &str) -> Result<(bool, Option<usize>)> {
        self.stat_impl(path)
    }

    /// Pre-order dump with a `"File: "`/`"Dir:  "` prefix per line, files
    /// before directories at each level.
    pub fn to_string(&self) -> Option<String> {
        self.to_string_impl(true)
    }
}
