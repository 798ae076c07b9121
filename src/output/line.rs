//! Plain-text formatting of tree lines and the status bar

use crate::digest::DigestStats;
use crate::tree::{NodeId, SelectionState, Tree};

pub const HELP: &str = "\
codetree help:

Navigation:
  k / up      Move up
  j / down    Move down
  h / left    Collapse directory / go to parent
  l / right   Expand directory
  enter       Open directory as new root / close preview

Selection:
  space       Toggle selection of current item
  a           Toggle selection of all visible items

Other:
  i           Toggle ignoring .gitignore rules
  g           Generate digest and quit
  o <file>    Set output file name
  p           Preview digest
  q           Quit
  ?           Toggle help
";

pub const KEY_HINTS: &str = "[g]enerate | [p]review | [o]utput | [q]uit | [?]help";

fn checkbox(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Full => "[x]",
        SelectionState::Partial => "[-]",
        SelectionState::None => "[ ]",
    }
}

/// Render one node as a display line: cursor marker, checkbox, tree
/// connectors, expander and name.
pub fn format_line(tree: &Tree, id: NodeId, is_cursor: bool) -> String {
    let node = tree.node(id);
    let mut line = String::with_capacity(node.depth * 4 + node.name.len() + 12);

    line.push_str(if is_cursor { "> " } else { "  " });
    line.push_str(checkbox(node.state));
    line.push(' ');

    // The root has no siblings, so it never draws a connector column.
    for ancestor in tree.ancestors(id).into_iter().skip(1) {
        if tree.node(ancestor).is_last {
            line.push_str("    ");
        } else {
            line.push_str("│   ");
        }
    }
    if node.depth > 0 {
        line.push_str(if node.is_last { "└── " } else { "├── " });
    }

    if node.is_dir {
        line.push_str(if node.expanded { "▾ " } else { "▸ " });
        line.push_str(&node.name);
        line.push('/');
    } else {
        line.push_str("  ");
        line.push_str(&node.name);
    }
    line
}

/// Status bar text for the current selection.
pub fn format_status(stats: &DigestStats) -> String {
    let tokens = stats
        .total_tokens
        .map_or_else(|| "n/a".to_string(), |t| t.to_string());
    format!(
        "Selected: {} files, {} dirs | Size: {} | Tokens: {}",
        stats.files,
        stats.directories,
        format_size(stats.total_bytes),
        tokens
    )
}

/// Format a size in bytes to human-readable format.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}G", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}M", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1}K", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
