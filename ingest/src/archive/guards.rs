//! Integrity guards composed into the extraction loop.
//!
//! Each guard is a standalone function so that it can be exercised with
//! synthetic entry lists, without building real archives.

use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::entry::ArchiveEntry;
use super::error::{ExtractionError, Result};

/// Normalise an archive-internal path into a path relative to the
/// destination root.
///
/// Backslashes are treated as separators and `.` components are dropped. A
/// `..` component cancels the preceding component; the path is rejected when
/// it would climb above the destination root, or when it is absolute.
///
/// # Errors
///
/// Returns [`ExtractionError::PathTraversal`] when the path escapes the
/// destination root.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use coursepack_ingest::archive::guards::normalise_entry_path;
///
/// let path = normalise_entry_path("content/./media/../index.html").expect("inside root");
/// assert_eq!(path, PathBuf::from("content/index.html"));
/// assert!(normalise_entry_path("../outside.txt").is_err());
/// ```
pub fn normalise_entry_path(raw: &str) -> Result<PathBuf> {
    let traversal = || ExtractionError::PathTraversal {
        path: raw.to_owned(),
    };
    let unified = raw.replace('\\', "/");
    let mut normalised = PathBuf::new();

    for component in Path::new(&unified).components() {
        match component {
            Component::Normal(part) => normalised.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalised.pop() {
                    return Err(traversal());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }

    Ok(normalised)
}

/// Count the non-directory entries an archive declares.
#[must_use]
pub fn expected_file_count(entries: &[ArchiveEntry]) -> usize {
    entries.iter().filter(|entry| entry.is_file()).count()
}

/// Reject a file written with zero bytes when the archive declared content.
///
/// # Errors
///
/// Returns [`ExtractionError::CorruptEntry`] for an empty write of a
/// non-empty entry.
pub fn verify_written_entry(entry: &ArchiveEntry, written: u64) -> Result<()> {
    if written == 0 && entry.size > 0 {
        return Err(ExtractionError::corrupt(
            entry.path.as_str(),
            format!(
                "wrote 0 bytes but the archive declares {} bytes",
                entry.size
            ),
        ));
    }
    Ok(())
}

/// Compare the number of files found on disk with the expected count.
///
/// # Errors
///
/// Returns [`ExtractionError::IncompleteExtraction`] on any mismatch.
pub fn verify_file_count(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ExtractionError::IncompleteExtraction { expected, actual });
    }
    Ok(())
}

/// Recursively count the non-directory entries below `root`.
///
/// # Errors
///
/// Returns an I/O error when any part of the tree cannot be read.
pub fn count_files(root: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        if !entry?.file_type().is_dir() {
            count += 1;
        }
    }
    Ok(count)
}
