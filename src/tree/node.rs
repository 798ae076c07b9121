//! Arena-backed tree model

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Tri-state selection mark of a node.
///
/// Files are only ever `None` or `Full`; `Partial` marks a directory with a
/// strict, non-empty subset of selected descendants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    None,
    Partial,
    Full,
}

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One filesystem entry.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub depth: usize,
    /// Only meaningful for directories.
    pub expanded: bool,
    pub state: SelectionState,
    pub is_last: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(
        name: String,
        path: PathBuf,
        is_dir: bool,
        depth: usize,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            name,
            path,
            is_dir,
            depth,
            expanded: false,
            state: SelectionState::None,
            is_last: false,
            parent,
            children: Vec::new(),
        }
    }
}

/// A directory tree. Nodes are owned by the arena; `children` lists are the
/// only ownership edges and `parent` is a plain index back-reference.
#[derive(Debug, Clone)]
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
}

impl Tree {
    /// Create a tree holding only a root node.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, is_dir: bool) -> Self {
        let mut root = Node::new(name.into(), path.into(), is_dir, 0, None);
        root.expanded = is_dir;
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Append a child under `parent`. Marks it as the last child, clearing the
    /// flag on its previous sibling.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        is_dir: bool,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        let mut node = Node::new(name.into(), path.into(), is_dir, depth, Some(parent));
        node.is_last = true;
        self.nodes.push(node);

        if let Some(&prev) = self.nodes[parent.0].children.last() {
            self.nodes[prev.0].is_last = false;
        }
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.nodes[self.root.0].path
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn state(&self, id: NodeId) -> SelectionState {
        self.nodes[id.0].state
    }

    /// Find a node by its path relative to the root (`/`-separated).
    pub fn find(&self, relative: &str) -> Option<NodeId> {
        let mut current = self.root;
        for part in relative.split('/').filter(|p| !p.is_empty() && *p != ".") {
            current = *self
                .children(current)
                .iter()
                .find(|&&c| self.nodes[c.0].name == part)?;
        }
        Some(current)
    }

    /// Path of a node relative to the root, `/`-separated. Empty for the root.
    pub fn relative_path(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match node.path.strip_prefix(self.root_path()) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => node.path.display().to_string(),
        }
    }

    /// Ancestors of a node from the root downward, excluding the node itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes[id.0].depth);
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            out.push(p);
            current = self.nodes[p.0].parent;
        }
        out.reverse();
        out
    }

    /// All node ids in pre-order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Set the `expanded` flag of a directory. Returns true if it changed.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        let node = &mut self.nodes[id.0];
        if !node.is_dir || node.expanded == expanded {
            return false;
        }
        node.expanded = expanded;
        true
    }

    /// Expand every directory in the tree.
    pub fn expand_all(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.is_dir) {
            node.expanded = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut tree = Tree::new("root", "/r", true);
        let root = tree.root();
        tree.add_child(root, "a.txt", "/r/a.txt", false);
        let sub = tree.add_child(root, "sub", "/r/sub", true);
        tree.add_child(sub, "c.txt", "/r/sub/c.txt", false);
        tree
    }

    #[test]
    fn test_root_invariants() {
        let tree = sample();
        let root = tree.node(tree.root());
        assert_eq!(root.depth, 0);
        assert!(root.parent.is_none());
        assert!(root.expanded);
    }

    #[test]
    fn test_depth_follows_parent() {
        let tree = sample();
        for id in tree.preorder() {
            if let Some(p) = tree.parent(id) {
                assert_eq!(tree.node(id).depth, tree.node(p).depth + 1);
            }
        }
    }

    #[test]
    fn test_is_last_tracks_final_sibling() {
        let tree = sample();
        let a = tree.find("a.txt").unwrap();
        let sub = tree.find("sub").unwrap();
        let c = tree.find("sub/c.txt").unwrap();
        assert!(!tree.node(a).is_last);
        assert!(tree.node(sub).is_last);
        assert!(tree.node(c).is_last);
    }

    #[test]
    fn test_relative_path_and_find() {
        let tree = sample();
        let c = tree.find("sub/c.txt").unwrap();
        assert_eq!(tree.relative_path(c), "sub/c.txt");
        assert_eq!(tree.relative_path(tree.root()), "");
        assert_eq!(tree.find(""), Some(tree.root()));
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn test_preorder_and_ancestors() {
        let tree = sample();
        let names: Vec<_> = tree.preorder().iter().map(|&id| tree.node(id).name.clone()).collect();
        assert_eq!(names, vec!["root", "a.txt", "sub", "c.txt"]);

        let c = tree.find("sub/c.txt").unwrap();
        let ancestors: Vec<_> = tree
            .ancestors(c)
            .iter()
            .map(|&id| tree.node(id).name.clone())
            .collect();
        assert_eq!(ancestors, vec!["root", "sub"]);
    }

    #[test]
    fn test_set_expanded_ignores_files() {
        let mut tree = sample();
        let a = tree.find("a.txt").unwrap();
        let sub = tree.find("sub").unwrap();
        assert!(!tree.set_expanded(a, true));
        assert!(tree.set_expanded(sub, true));
        assert!(!tree.set_expanded(sub, true));
    }
}
