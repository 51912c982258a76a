//! Resolution of `imsmanifest.xml` into a launchable package structure.
//!
//! Resolution is read-only: it parses the descriptor of an already extracted
//! package, indexes its resources, picks the default organization and
//! flattens that organization's item tree into launchable items.
//!
//! Two permissive policies are accepted rather than rejected. When several
//! resources share an identifier the later one wins, and when the declared
//! default organization is missing or names nothing the first organization is
//! used. A launchable item referencing an unknown resource is an error.
//!
//! # Sub-modules
//!
//! - [`document`] — Pure traversal helpers over a parsed document.
//! - [`error`] — The closed `ResolutionError` taxonomy.
//! - [`model`] — Output types serialized for the player.
//! - [`resolver`] — The resolution steps.

pub mod document;
pub mod error;
pub mod model;
pub mod resolver;

pub use document::MANIFEST_FILE_NAME;
pub use error::ResolutionError;
pub use model::{LaunchableItem, ResolvedPackage, ResourceEntry};
pub use resolver::{resolve, resolve_document};
