//! Archive entry model and the sources that enumerate entries.
//!
//! The extraction transaction never talks to the `zip` crate directly. It
//! consumes an [`EntrySource`], which lists entry metadata from the archive
//! index up front and then opens one entry at a time for streaming. This keeps
//! the transaction loop testable with synthetic entry lists.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Whether an archive entry is a directory marker or a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file with content.
    File,
    /// A directory marker without content.
    Directory,
}

/// Metadata for one entry of an archive index.
///
/// The path is archive-internal and untrusted: it must pass
/// [`normalise_entry_path`](super::guards::normalise_entry_path) before it is
/// joined onto a destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry path as stored in the archive.
    pub path: String,
    /// File or directory marker.
    pub kind: EntryKind,
    /// Uncompressed size declared by the archive, in bytes.
    pub size: u64,
}

impl ArchiveEntry {
    /// Creates a file entry declaring `size` bytes.
    #[must_use]
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    /// Creates a directory marker.
    #[must_use]
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    /// Returns `true` for file entries.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }
}

/// Sequential access to the entries of an archive.
pub trait EntrySource {
    /// Lists every entry in archive order without decompressing content.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the archive index cannot be read.
    fn entries(&mut self) -> io::Result<Vec<ArchiveEntry>>;

    /// Opens the entry at `index` (as listed by [`Self::entries`]) for
    /// streaming decompression.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the entry cannot be opened.
    fn open(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>>;
}

/// [`EntrySource`] backed by a ZIP archive on disk.
pub struct ZipSource {
    archive: zip::ZipArchive<File>,
}

impl ZipSource {
    /// Opens the ZIP archive at `path` and reads its central directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the file cannot be opened or is not a valid
    /// ZIP archive.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let archive = zip::ZipArchive::new(file).map_err(io::Error::other)?;
        Ok(Self { archive })
    }
}

/// Names ending in `/`, or empty entries ending in `\` as written by some
/// Windows tools, mark directories.
fn is_directory_marker(name: &str, size: u64) -> bool {
    name.ends_with('/') || (name.ends_with('\\') && size == 0)
}

impl EntrySource for ZipSource {
    fn entries(&mut self) -> io::Result<Vec<ArchiveEntry>> {
        (0..self.archive.len())
            .map(|index| {
                let entry = self.archive.by_index(index).map_err(io::Error::other)?;
                let kind = if is_directory_marker(entry.name(), entry.size()) {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                Ok(ArchiveEntry {
                    path: entry.name().to_owned(),
                    kind,
                    size: entry.size(),
                })
            })
            .collect()
    }

    fn open(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        let entry = self.archive.by_index(index).map_err(io::Error::other)?;
        Ok(Box::new(entry))
    }
}
