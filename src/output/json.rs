//! JSON output formatting

use std::io;

use crate::digest::DigestStats;

/// Print selection statistics as pretty-printed JSON to stdout.
pub fn print_stats_json(stats: &DigestStats) -> io::Result<()> {
    let json = serde_json::to_string_pretty(stats).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}
