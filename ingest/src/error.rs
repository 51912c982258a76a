//! Error types for the ingestion pipeline and CLI.
//!
//! [`IngestError`] wraps the extraction and resolution taxonomies and adds the
//! failures that only exist around them: configuration, package naming and
//! removal, and writing output. Every variant maps to its own exit code.

use camino::Utf8PathBuf;
use coursepack_common::ConfigError;
use thiserror::Error;

use crate::archive::ExtractionError;
use crate::manifest::ResolutionError;

/// Errors that can occur while ingesting, resolving or removing a package.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The archive could not be extracted; the destination was rolled back.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The extracted package could not be resolved.
    #[error("resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// No package directory with this name exists under the content root.
    #[error("package {name} not found under {root}")]
    PackageNotFound {
        /// The requested folder name.
        name: String,
        /// The content root that was searched.
        root: Utf8PathBuf,
    },

    /// The name cannot denote a single folder directly under the content
    /// root.
    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A filesystem operation outside extraction failed.
    #[error("{operation} {path} failed")]
    Io {
        /// What was being attempted, such as `remove`.
        operation: &'static str,
        /// The path involved.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// Process exit code for this error.
    ///
    /// Codes are grouped: 2 to 6 for configuration, naming and I/O problems,
    /// 10 to 13 for extraction, and 20 to 24 for resolution.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::InvalidPackageName { .. } => 3,
            Self::PackageNotFound { .. } => 4,
            Self::Io { .. } => 5,
            Self::WriteFailed { .. } => 6,
            Self::Extraction(err) => match err {
                ExtractionError::PathTraversal { .. } => 10,
                ExtractionError::CorruptEntry { .. } => 11,
                ExtractionError::IncompleteExtraction { .. } => 12,
                ExtractionError::DestinationNotEmpty { .. } => 13,
            },
            Self::Resolution(err) => match err {
                ResolutionError::ManifestMissing { .. } => 20,
                ResolutionError::ManifestParse { .. } => 21,
                ResolutionError::OrganizationsMissing => 22,
                ResolutionError::OrganizationMissing => 23,
                ResolutionError::DanglingResourceReference { .. } => 24,
            },
        }
    }
}

/// Result type alias using [`IngestError`].
pub type Result<T> = std::result::Result<T, IngestError>;
