//! Flattening of the tree into the list of currently visible nodes

use super::node::{NodeId, Tree};

/// Nodes reachable from the root through expanded directories, in pre-order.
///
/// The root is always included. A collapsed directory contributes only itself.
pub fn flatten_visible(tree: &Tree) -> Vec<NodeId> {
    let mut visible = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        visible.push(id);
        let node = tree.node(id);
        if node.is_dir && node.expanded {
            stack.extend(node.children.iter().rev());
        }
    }
    visible
}

/// Position of `target` in `visible`, or the nearest valid index to
/// `fallback` when it is no longer visible.
pub fn reanchor(visible: &[NodeId], target: NodeId, fallback: usize) -> usize {
    visible
        .iter()
        .position(|&id| id == target)
        .unwrap_or_else(|| fallback.min(visible.len().saturating_sub(1)))
}
