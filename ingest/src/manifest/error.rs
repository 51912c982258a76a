//! Error types for manifest resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors arising from manifest resolution.
///
/// All variants are terminal for one resolution call: no partial package is
/// returned and nothing on disk is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The extracted directory has no `imsmanifest.xml`.
    #[error("manifest not found at {}", .path.display())]
    ManifestMissing {
        /// Path where the manifest was expected.
        path: PathBuf,
    },

    /// The manifest could not be read as text or is not well-formed XML.
    #[error("failed to parse manifest: {reason}")]
    ManifestParse {
        /// Description of the read or parse failure.
        reason: String,
    },

    /// The manifest declares no `organizations` element.
    #[error("manifest declares no organizations element")]
    OrganizationsMissing,

    /// The `organizations` element contains no `organization`.
    #[error("manifest declares no organization")]
    OrganizationMissing,

    /// A launchable item references a resource the manifest does not declare.
    #[error("item {item} references unknown resource {reference}")]
    DanglingResourceReference {
        /// Identifier of the offending item.
        item: String,
        /// The unresolved `identifierref` value.
        reference: String,
    },
}

/// Result type for manifest resolution.
pub type Result<T> = std::result::Result<T, ResolutionError>;
