//! Transactional extraction of uploaded package archives.
//!
//! An archive is either extracted completely and verified, or its destination
//! directory is removed again before the error reaches the caller. No partial
//! package is ever left behind looking like a successful upload.
//!
//! # Sub-modules
//!
//! - [`entry`] — Entry model (`ArchiveEntry`) and the `EntrySource` seam over
//!   ZIP archives.
//! - [`error`] — The closed `ExtractionError` taxonomy.
//! - [`extraction`] — The `PackageExtractor` trait, `ZipExtractor`, and the
//!   sequential extraction transaction with rollback.
//! - [`guards`] — Path traversal, zero-byte, and file-count checks.

pub mod entry;
pub mod error;
pub mod extraction;
pub mod guards;

pub use entry::{ArchiveEntry, EntryKind, EntrySource, ZipSource};
pub use error::ExtractionError;
pub use extraction::{
    ArchiveRetention, ExtractionResult, PackageExtractor, ZipExtractor, extract_entries,
};
