//! Display formatting
//!
//! - `config` - Output configuration types
//! - `line` - Plain-text tree lines, status bar and help text
//! - `view` - Colored rendering of sessions and trees
//! - `json` - JSON output

mod config;
mod json;
mod line;
mod view;

pub use config::OutputConfig;
pub use json::print_stats_json;
pub use line::{HELP, KEY_HINTS, format_line, format_size, format_status};
pub use view::TreeView;
