//! Error types for archive extraction.
//!
//! The taxonomy is closed: unexpected I/O failures are folded into the
//! nearest variant so that callers can map every kind exhaustively.

use std::fmt::Display;
use std::path::PathBuf;

use thiserror::Error;

/// Errors arising from archive extraction.
///
/// Every variant except [`ExtractionError::DestinationNotEmpty`] is raised
/// after the destination was prepared and is preceded by a rollback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// An entry path normalises to a location outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path as stored in the archive.
        path: String,
    },

    /// An entry could not be read or written, or was written empty although
    /// the archive declares content for it.
    #[error("corrupt archive entry {entry}: {reason}")]
    CorruptEntry {
        /// The archive-internal entry name, or the archive path when the
        /// archive itself is unreadable.
        entry: String,
        /// Description of the failure.
        reason: String,
    },

    /// The files on disk do not match the archive's file entries.
    #[error("extraction incomplete: expected {expected} files but found {actual}")]
    IncompleteExtraction {
        /// Number of non-directory entries declared by the archive.
        expected: usize,
        /// Number of files present when extraction stopped.
        actual: usize,
    },

    /// The destination already holds files from an earlier extraction.
    #[error("destination {} is not empty", .path.display())]
    DestinationNotEmpty {
        /// The rejected destination directory.
        path: PathBuf,
    },
}

impl ExtractionError {
    /// Builds a [`ExtractionError::CorruptEntry`] from any displayable cause.
    pub(crate) fn corrupt(entry: impl Into<String>, reason: impl Display) -> Self {
        Self::CorruptEntry {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using [`ExtractionError`].
pub type Result<T> = std::result::Result<T, ExtractionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_extraction_reports_both_counts() {
        let err = ExtractionError::IncompleteExtraction {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "extraction incomplete: expected 4 files but found 3"
        );
    }

    #[test]
    fn corrupt_helper_captures_reason() {
        let err = ExtractionError::corrupt("lesson/index.html", "disk full");
        assert_eq!(
            err,
            ExtractionError::CorruptEntry {
                entry: "lesson/index.html".to_owned(),
                reason: "disk full".to_owned(),
            }
        );
    }

    #[test]
    fn destination_not_empty_names_directory() {
        let err = ExtractionError::DestinationNotEmpty {
            path: PathBuf::from("uploads/1700-demo"),
        };
        assert!(err.to_string().contains("uploads/1700-demo"));
    }
}
