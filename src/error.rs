//! Error types for codetree

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by tree building, path validation and digest output.
///
/// Unreadable files during digest generation are not represented here:
/// they are dropped from the digest and logged.
#[derive(Debug, Error)]
pub enum Error {
    /// A path could not be stat'ed or a directory could not be listed.
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The user-supplied root does not exist or is not a directory.
    #[error("'{}' is not a directory", .0.display())]
    InvalidRootPath(PathBuf),

    /// The tokenizer could not be loaded.
    #[error("tokenizer unavailable: {0}")]
    TokenizerUnavailable(String),

    /// Writing the digest to its output file failed.
    #[error("cannot write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
