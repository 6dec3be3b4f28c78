use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// Errors raised while rewriting one in-memory source buffer
///
/// Offsets are byte offsets into the original source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Malformed lexical token sequence
    #[error("scan error at byte {offset}: {message}")]
    Scan { offset: usize, message: String },
    /// A `package` or `import` keyword not followed by the required token
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

impl RewriteError {
    pub fn scan(offset: usize, message: impl Into<String>) -> Self {
        RewriteError::Scan { offset, message: message.into() }
    }

    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        RewriteError::Syntax { offset, message: message.into() }
    }

    pub fn offset(&self) -> usize {
        match self {
            RewriteError::Scan { offset, .. } | RewriteError::Syntax { offset, .. } => *offset,
        }
    }
}

/// Errors surfaced by a repack run
#[derive(Debug, Error)]
pub enum RepackError {
    /// File read or write failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Scan or syntax failure inside a file
    #[error("{}:{position}: {source}", .path.display())]
    Rewrite {
        path: PathBuf,
        position: Position,
        #[source]
        source: RewriteError,
    },
    /// Directory traversal failure
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
    /// Invalid options
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Malformed JSON configuration
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepackError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RepackError::Io { path: path.into(), source }
    }
}

/// Result alias used across the crate
pub type Result<T, E = RepackError> = std::result::Result<T, E>;
