//! Selection tree: model, building, selection and visibility
//!
//! - `node`: arena-backed tree of filesystem entries
//! - `builder`: scans a directory into a tree, applying ignore rules
//! - `selection`: tri-state selection propagation
//! - `visible`: flattening into the cursor-navigable visible list

mod builder;
mod config;
mod node;
mod selection;
mod visible;

pub use builder::TreeBuilder;
pub use config::BuildConfig;
pub use node::{Node, NodeId, SelectionState, Tree};
pub use visible::{flatten_visible, reanchor};
