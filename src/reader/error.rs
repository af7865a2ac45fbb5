//! Error types for keyword-anchored reads.

use std::fmt;

/// Errors that can occur while constructing a [`KeywordReader`] or running
/// one of its read operations.
///
/// Every failure is detected synchronously and returned to the caller;
/// nothing is logged or swallowed, and no partial result is ever produced.
/// These are deterministic parse failures over static input, so retrying a
/// call without changing the file or the arguments cannot succeed.
///
/// [`KeywordReader`]: crate::reader::KeywordReader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The path given to the constructor does not name an existing file.
    FileNotFound { path: String },
    /// The file exists but could not be read (permissions, bad gzip data,
    /// invalid UTF-8).
    Io { path: String, message: String },
    /// The requested document index is outside `[0, count)`.
    DocumentIndex { index: usize, count: usize },
    /// No line in the selected document anchors the keyword.
    KeywordNotFound { keyword: String },
    /// The keyword anchored a line, but its indentation scope contains no
    /// list items or dictionary entries.
    EmptyScope { keyword: String },
    /// Raw text could not be coerced into the requested type.
    Coercion { value: String, target: &'static str },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::FileNotFound { path } => {
                write!(f, "file '{}' does not exist", path)
            }
            ReadError::Io { path, message } => {
                write!(f, "failed to read '{}': {}", path, message)
            }
            ReadError::DocumentIndex { index, count } => write!(
                f,
                "document index {} out of range for file with {} document(s)",
                index, count
            ),
            ReadError::KeywordNotFound { keyword } => {
                write!(f, "keyword '{}' not found in document", keyword)
            }
            ReadError::EmptyScope { keyword } => {
                write!(f, "keyword '{}' anchors no entries", keyword)
            }
            ReadError::Coercion { value, target } => {
                write!(f, "cannot coerce '{}' into {}", value, target)
            }
        }
    }
}

impl std::error::Error for ReadError {}
