//! Tri-state selection propagation
//!
//! Setting a node's state overwrites its whole subtree top-down, then walks
//! up through its ancestors recomputing each directory from its children.
//!
//! Empty directories keep whatever state was set on them explicitly and do
//! not count toward their parent's aggregate. A directory whose children are
//! all empty directories therefore keeps its own state too.

use super::node::{NodeId, SelectionState, Tree};

impl Tree {
    /// Set the selection state of a node and its descendants, then
    /// re-aggregate its ancestors.
    ///
    /// `Partial` is derived, never set: passing it is a no-op and returns
    /// false.
    pub fn set_selection(&mut self, id: NodeId, state: SelectionState) -> bool {
        if state == SelectionState::Partial {
            return false;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current.0];
            node.state = state;
            stack.extend(node.children.iter().copied());
        }

        if let Some(parent) = self.nodes[id.0].parent {
            self.reaggregate(parent);
        }
        true
    }

    /// Flip a node: `Full` or `Partial` becomes `None`, `None` becomes `Full`.
    pub fn toggle(&mut self, id: NodeId) {
        let next = match self.nodes[id.0].state {
            SelectionState::None => SelectionState::Full,
            SelectionState::Full | SelectionState::Partial => SelectionState::None,
        };
        self.set_selection(id, next);
    }

    /// Recompute `id` and every ancestor from their children.
    pub fn reaggregate(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(dir) = current {
            if !self.nodes[dir.0].is_dir {
                return;
            }
            if let Some(state) = self.aggregate(dir) {
                self.nodes[dir.0].state = state;
            }
            current = self.nodes[dir.0].parent;
        }
    }

    /// Aggregate state of a directory's counted children, or `None` when no
    /// child counts (no children, or only empty directories).
    fn aggregate(&self, dir: NodeId) -> Option<SelectionState> {
        let mut total = 0usize;
        let mut full = 0usize;
        let mut partial = 0usize;
        for &child in &self.nodes[dir.0].children {
            let node = &self.nodes[child.0];
            if node.is_dir && node.children.is_empty() {
                continue;
            }
            total += 1;
            match node.state {
                SelectionState::Full => full += 1,
                SelectionState::Partial => partial += 1,
                SelectionState::None => {}
            }
        }

        if total == 0 {
            None
        } else if full == total {
            Some(SelectionState::Full)
        } else if full > 0 || partial > 0 {
            Some(SelectionState::Partial)
        } else {
            Some(SelectionState::None)
        }
    }

    /// Select every node in `visible` if any of them is not fully selected,
    /// otherwise clear them all. Returns the state that was applied.
    pub fn select_all_visible(&mut self, visible: &[NodeId]) -> SelectionState {
        let select = visible
            .iter()
            .any(|&id| self.nodes[id.0].state != SelectionState::Full);
        let state = if select {
            SelectionState::Full
        } else {
            SelectionState::None
        };
        for &id in visible {
            self.set_selection(id, state);
        }
        state
    }

    /// Selected files in pre-order.
    pub fn selected_files(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| {
                let node = &self.nodes[id.0];
                !node.is_dir && node.state == SelectionState::Full
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::flatten_visible;

    use SelectionState::{Full, None as Empty, Partial};

    /// root/
    ///   a.txt
    ///   b.txt
    ///   sub/
    ///     c.txt
    ///     deep/
    ///       d.txt
    ///       e.txt
    ///   hollow/        (empty)
    fn sample() -> Tree {
        let mut tree = Tree::new("root", "/r", true);
        let root = tree.root();
        tree.add_child(root, "a.txt", "/r/a.txt", false);
        tree.add_child(root, "b.txt", "/r/b.txt", false);
        let sub = tree.add_child(root, "sub", "/r/sub", true);
        tree.add_child(sub, "c.txt", "/r/sub/c.txt", false);
        let deep = tree.add_child(sub, "deep", "/r/sub/deep", true);
        tree.add_child(deep, "d.txt", "/r/sub/deep/d.txt", false);
        tree.add_child(deep, "e.txt", "/r/sub/deep/e.txt", false);
        tree.add_child(root, "hollow", "/r/hollow", true);
        tree
    }

    fn id(tree: &Tree, path: &str) -> NodeId {
        tree.find(path).unwrap()
    }

    /// Aggregate rule checked independently of the propagation code.
    fn assert_consistent(tree: &Tree) {
        for dir in tree.preorder() {
            let node = tree.node(dir);
            if node.is_dir {
                let counted: Vec<_> = node
                    .children
                    .iter()
                    .filter(|&&c| !(tree.node(c).is_dir && tree.node(c).children.is_empty()))
                    .map(|&c| tree.state(c))
                    .collect();
                if counted.is_empty() {
                    continue;
                }
                let expected = if counted.iter().all(|&s| s == Full) {
                    Full
                } else if counted.iter().all(|&s| s == Empty) {
                    Empty
                } else {
                    Partial
                };
                assert_eq!(node.state, expected, "directory {} inconsistent", node.name);
            } else {
                assert_ne!(node.state, Partial, "file {} is partial", node.name);
            }
        }
    }

    #[test]
    fn test_selecting_directory_selects_descendants() {
        let mut tree = sample();
        let sub = id(&tree, "sub");
        tree.set_selection(sub, Full);
        for path in ["sub/c.txt", "sub/deep", "sub/deep/d.txt", "sub/deep/e.txt"] {
            assert_eq!(tree.state(id(&tree, path)), Full, "{}", path);
        }
        assert_eq!(tree.state(tree.root()), Partial);

        tree.set_selection(sub, Empty);
        for path in ["sub/c.txt", "sub/deep/d.txt", "sub/deep/e.txt"] {
            assert_eq!(tree.state(id(&tree, path)), Empty, "{}", path);
        }
        assert_eq!(tree.state(tree.root()), Empty);
    }

    #[test]
    fn test_single_selected_child_makes_parent_full() {
        let mut tree = Tree::new("root", "/r", true);
        let root = tree.root();
        let a = tree.add_child(root, "a.txt", "/r/a.txt", false);
        let b = tree.add_child(root, "b.txt", "/r/b.txt", false);
        let sub = tree.add_child(root, "sub", "/r/sub", true);
        let c = tree.add_child(sub, "c.txt", "/r/sub/c.txt", false);

        tree.set_selection(a, Full);
        tree.set_selection(c, Full);
        assert_eq!(tree.state(sub), Full);
        assert_eq!(tree.state(b), Empty);
        assert_eq!(tree.state(root), Partial);
    }

    #[test]
    fn test_partial_propagates_through_ancestors() {
        let mut tree = sample();
        tree.set_selection(id(&tree, "sub/deep/d.txt"), Full);
        assert_eq!(tree.state(id(&tree, "sub/deep")), Partial);
        assert_eq!(tree.state(id(&tree, "sub")), Partial);
        assert_eq!(tree.state(tree.root()), Partial);

        tree.set_selection(id(&tree, "sub/deep/e.txt"), Full);
        assert_eq!(tree.state(id(&tree, "sub/deep")), Full);
        assert_eq!(tree.state(id(&tree, "sub")), Partial);
    }

    #[test]
    fn test_all_children_full_makes_root_full() {
        let mut tree = sample();
        for path in ["a.txt", "b.txt", "sub"] {
            tree.set_selection(id(&tree, path), Full);
        }
        // the empty `hollow` directory does not count
        assert_eq!(tree.state(id(&tree, "hollow")), Empty);
        assert_eq!(tree.state(tree.root()), Full);
    }

    #[test]
    fn test_empty_directory_keeps_explicit_state() {
        let mut tree = sample();
        let hollow = id(&tree, "hollow");
        tree.set_selection(hollow, Full);
        assert_eq!(tree.state(hollow), Full);
        assert_eq!(tree.state(tree.root()), Empty);

        tree.reaggregate(hollow);
        assert_eq!(tree.state(hollow), Full);
    }

    #[test]
    fn test_partial_cannot_be_set() {
        let mut tree = sample();
        let a = id(&tree, "a.txt");
        assert!(!tree.set_selection(a, Partial));
        assert_eq!(tree.state(a), Empty);
    }

    #[test]
    fn test_toggle() {
        let mut tree = sample();
        let sub = id(&tree, "sub");
        tree.toggle(sub);
        assert_eq!(tree.state(sub), Full);
        tree.toggle(id(&tree, "sub/c.txt"));
        assert_eq!(tree.state(sub), Partial);
        tree.toggle(sub);
        assert_eq!(tree.state(sub), Empty);
        assert_eq!(tree.state(id(&tree, "sub/deep/d.txt")), Empty);
    }

    #[test]
    fn test_reaggregate_is_idempotent() {
        let mut tree = sample();
        tree.set_selection(id(&tree, "sub/c.txt"), Full);
        tree.set_selection(id(&tree, "a.txt"), Full);
        let before: Vec<_> = tree.preorder().iter().map(|&n| tree.state(n)).collect();
        for node in tree.preorder() {
            tree.reaggregate(node);
            tree.reaggregate(node);
        }
        let after: Vec<_> = tree.preorder().iter().map(|&n| tree.state(n)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_random_toggle_sequences_stay_consistent() {
        let mut tree = sample();
        let ids = tree.preorder();
        // xorshift keeps the sequence reproducible without extra crates
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let target = ids[(seed % ids.len() as u64) as usize];
            if seed & 0x100 == 0 {
                tree.toggle(target);
            } else {
                let state = if seed & 0x200 == 0 { Full } else { Empty };
                tree.set_selection(target, state);
            }
            assert_consistent(&tree);
        }
    }

    #[test]
    fn test_select_all_visible_selects_collapsed_descendants() {
        let mut tree = sample();
        let visible = flatten_visible(&tree);
        // root expanded, children collapsed
        assert_eq!(visible.len(), 5);

        assert_eq!(tree.select_all_visible(&visible), Full);
        for node in tree.preorder() {
            assert_eq!(tree.state(node), Full, "{}", tree.node(node).name);
        }

        assert_eq!(tree.select_all_visible(&visible), Empty);
        for node in tree.preorder() {
            assert_eq!(tree.state(node), Empty);
        }
    }

    #[test]
    fn test_select_all_visible_with_partial_selects() {
        let mut tree = sample();
        tree.set_selection(id(&tree, "a.txt"), Full);
        let visible = flatten_visible(&tree);
        assert_eq!(tree.select_all_visible(&visible), Full);
        assert_eq!(tree.state(tree.root()), Full);
    }

    #[test]
    fn test_selected_files_in_preorder() {
        let mut tree = sample();
        tree.set_selection(id(&tree, "sub/deep"), Full);
        tree.set_selection(id(&tree, "a.txt"), Full);
        let files: Vec<_> = tree
            .selected_files()
            .iter()
            .map(|&n| tree.relative_path(n))
            .collect();
        assert_eq!(files, vec!["a.txt", "sub/deep/d.txt", "sub/deep/e.txt"]);
    }
}
