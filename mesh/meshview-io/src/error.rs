//! Error types for mesh loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh loading operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading a mesh file.
///
/// Loads are one-shot: every variant aborts the load and leaves the
/// destination mesh empty. No partial geometry is ever exposed.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The file does not start with the `ply` magic token.
    #[error("not a recognized mesh file: expected \"ply\" magic, found {found:?}")]
    BadMagic {
        /// The token found in place of the magic.
        found: String,
    },

    /// The header is missing required structure (`element` counts or
    /// `end_header`), or exceeded the header scan budget.
    #[error("malformed header at line {line}: {message}")]
    MalformedHeader {
        /// 1-based line number where the problem was detected.
        line: usize,
        /// Description of what was missing or invalid.
        message: String,
    },

    /// A face references a vertex index outside the vertex block.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// 0-based face number within the face block.
        face: usize,
        /// The offending vertex index.
        index: u32,
        /// Number of vertices declared in the header.
        vertex_count: usize,
    },

    /// A face has zero area, so no normal can be synthesized for it.
    #[error("face {face} is degenerate: zero area, cannot synthesize a normal")]
    DegenerateFace {
        /// 0-based face number within the face block.
        face: usize,
    },

    /// The file ended before the declared vertex or face records.
    #[error("unexpected end of file at line {line}")]
    UnexpectedEof {
        /// 1-based line number where input ran out.
        line: usize,
    },

    /// A data record held fewer fields than its layout requires.
    #[error("line {line}: expected {expected} fields, found {found}")]
    ShortRecord {
        /// 1-based line number of the record.
        line: usize,
        /// Number of fields the record layout requires.
        expected: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Float parsing error.
    #[error("float parsing error: {0}")]
    ParseFloat(#[from] std::num::ParseFloatError),

    /// Integer parsing error.
    #[error("integer parsing error: {0}")]
    ParseInt(#[from] std::num::ParseIntError),
}

impl IoError {
    /// Create a `MalformedHeader` error with the given location and message.
    #[must_use]
    pub fn malformed_header(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            message: message.into(),
        }
    }
}
