//! Digest generation: concatenates selected files into one document
//!
//! Each selected file becomes a record:
//!
//! ```text
//! --- relative/path.rs ---
//! <file content>
//!
//! ```
//!
//! Contents are copied byte for byte. Files are visited in tree pre-order
//! regardless of which directories are expanded. A file that cannot be read
//! is left out of the output and the statistics alike.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::tokens::{TikTokenCounter, TokenCounter};
use crate::tree::{NodeId, SelectionState, Tree};

/// Aggregate statistics over the files that make up a digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DigestStats {
    /// Number of files included
    pub files: usize,
    /// Number of fully selected directories reached by the traversal
    pub directories: usize,
    /// Raw byte size of the included file contents
    pub total_bytes: u64,
    /// Token count of the concatenated contents; `None` without a tokenizer
    pub total_tokens: Option<usize>,
}

/// A generated digest.
#[derive(Debug, Clone, Default)]
pub struct Digest {
    /// Raw digest bytes, file contents included unchanged.
    pub output: Vec<u8>,
    pub stats: DigestStats,
}

impl Digest {
    /// The digest decoded for display, invalid UTF-8 replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }

    /// Write the digest verbatim to `path`.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.output).map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            "wrote digest of {} files ({} bytes) to {}",
            self.stats.files,
            self.output.len(),
            path.display()
        );
        Ok(())
    }
}

/// One file that made it into the digest.
struct Record {
    relative: String,
    content: Vec<u8>,
}

#[derive(Default)]
struct Collected {
    records: Vec<Record>,
    directories: usize,
    bytes: u64,
}

/// Walks a tree's selection to produce digests and statistics.
pub struct DigestGenerator {
    counter: Option<Box<dyn TokenCounter>>,
}

impl DigestGenerator {
    /// Use the cl100k_base tokenizer, or no token counting if it cannot load.
    pub fn new() -> Self {
        match TikTokenCounter::new() {
            Ok(counter) => Self::with_counter(counter),
            Err(e) => {
                tracing::warn!("{}; token counts unavailable", e);
                Self::without_tokens()
            }
        }
    }

    pub fn with_counter(counter: impl TokenCounter + 'static) -> Self {
        Self {
            counter: Some(Box::new(counter)),
        }
    }

    pub fn without_tokens() -> Self {
        Self { counter: None }
    }

    /// Build the digest text and its statistics.
    pub fn generate(&self, tree: &Tree) -> Digest {
        let collected = collect(tree);

        let capacity = collected
            .records
            .iter()
            .map(|r| r.relative.len() + r.content.len() + 10)
            .sum();
        let mut output = Vec::with_capacity(capacity);
        for record in &collected.records {
            output.extend_from_slice(b"--- ");
            output.extend_from_slice(record.relative.as_bytes());
            output.extend_from_slice(b" ---\n");
            output.extend_from_slice(&record.content);
            output.push(b'\n');
        }

        let stats = self.summarize(&collected);
        Digest { output, stats }
    }

    /// Statistics for the current selection without building the output.
    pub fn stats(&self, tree: &Tree) -> DigestStats {
        self.summarize(&collect(tree))
    }

    fn summarize(&self, collected: &Collected) -> DigestStats {
        let total_tokens = self.counter.as_ref().map(|counter| {
            let text: String = collected
                .records
                .iter()
                .map(|r| String::from_utf8_lossy(&r.content))
                .collect();
            counter.count_tokens(&text)
        });

        DigestStats {
            files: collected.records.len(),
            directories: collected.directories,
            total_bytes: collected.bytes,
            total_tokens,
        }
    }
}

impl Default for DigestGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Read every selected file in pre-order, entering only directories that are
/// fully or partially selected.
fn collect(tree: &Tree) -> Collected {
    let mut collected = Collected::default();
    let mut stack: Vec<NodeId> = vec![tree.root()];

    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        match (node.is_dir, node.state) {
            (_, SelectionState::None) => {}
            (true, state) => {
                if state == SelectionState::Full {
                    collected.directories += 1;
                }
                stack.extend(node.children.iter().rev());
            }
            (false, SelectionState::Full) => match fs::read(&node.path) {
                Ok(bytes) => {
                    collected.bytes += bytes.len() as u64;
                    collected.records.push(Record {
                        relative: tree.relative_path(id),
                        content: bytes,
                    });
                }
                Err(e) => {
                    tracing::debug!("leaving out {}: {}", node.path.display(), e);
                }
            },
            (false, SelectionState::Partial) => {}
        }
    }

    collected
}
