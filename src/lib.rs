//! codetree - Pick files from a directory tree and pack them into one digest

pub mod digest;
pub mod error;
pub mod git;
pub mod output;
pub mod session;
pub mod tokens;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use digest::{Digest, DigestGenerator, DigestStats};
pub use error::{Error, Result};
pub use git::IgnoreFilter;
pub use output::{OutputConfig, TreeView, format_status, print_stats_json};
pub use session::{Command, Outcome, ParseCommandError, Session, validate_root};
pub use tokens::{TikTokenCounter, TokenCounter, WhitespaceCounter};
pub use tree::{
    BuildConfig, Node, NodeId, SelectionState, Tree, TreeBuilder, flatten_visible,
};
