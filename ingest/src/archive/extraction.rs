//! Archive extraction with rollback on failure.
//!
//! Entries are written strictly one after another: each file is streamed to
//! disk, flushed and synced before the next entry is opened. Any failure after
//! the destination was prepared removes the destination again, so callers
//! only ever observe a complete, verified package or no package at all.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::entry::{ArchiveEntry, EntryKind, EntrySource, ZipSource};
use super::error::{ExtractionError, Result};
use super::guards::{
    count_files, expected_file_count, normalise_entry_path, verify_file_count,
    verify_written_entry,
};

/// What happens to the uploaded archive when extraction fails.
///
/// The archive is always deleted after a verified success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArchiveRetention {
    /// Delete the archive on failure as well.
    #[default]
    RemoveOnFailure,
    /// Leave the archive in place on failure so the upload can be retried.
    KeepOnFailure,
}

impl ArchiveRetention {
    /// Maps the `remove_archive_on_failure` configuration flag.
    #[must_use]
    pub const fn from_remove_flag(remove_on_failure: bool) -> Self {
        if remove_on_failure {
            Self::RemoveOnFailure
        } else {
            Self::KeepOnFailure
        }
    }
}

/// Outcome of a successful, verified extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Root directory the archive was extracted into.
    pub destination: PathBuf,
    /// Number of files written and verified on disk.
    pub files_written: usize,
}

/// Trait for extracting package archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use coursepack_ingest::archive::ZipExtractor;
///
/// let extractor = ZipExtractor::new();
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait PackageExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
    /// escape the destination directory, [`ExtractionError::CorruptEntry`]
    /// when an entry cannot be read or is written empty,
    /// [`ExtractionError::IncompleteExtraction`] when the files on disk do
    /// not match the archive, and [`ExtractionError::DestinationNotEmpty`]
    /// when `dest_dir` already holds files.
    fn extract(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
    ) -> std::result::Result<ExtractionResult, ExtractionError>;
}

/// Production extractor for ZIP archives.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use coursepack_ingest::archive::{ArchiveRetention, ZipExtractor};
///
/// let extractor = ZipExtractor::new()
///     .with_retention(ArchiveRetention::KeepOnFailure)
///     .with_timeout(Some(Duration::from_secs(60)));
/// assert_eq!(extractor.retention(), ArchiveRetention::KeepOnFailure);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZipExtractor {
    retention: ArchiveRetention,
    timeout: Option<Duration>,
}

impl ZipExtractor {
    /// Creates an extractor that removes the archive on failure and has no
    /// deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the archive retention policy applied on failure.
    #[must_use]
    pub const fn with_retention(mut self, retention: ArchiveRetention) -> Self {
        self.retention = retention;
        self
    }

    /// Sets a deadline for the whole extraction loop.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured retention policy.
    #[must_use]
    pub const fn retention(&self) -> ArchiveRetention {
        self.retention
    }
}

impl PackageExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<ExtractionResult> {
        info!(
            "extracting {} into {}",
            archive_path.display(),
            dest_dir.display()
        );
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        let outcome = ZipSource::from_path(archive_path)
            .map_err(|err| ExtractionError::corrupt(archive_path.display().to_string(), err))
            .and_then(|mut source| extract_entries(&mut source, dest_dir, deadline));

        settle_archive(archive_path, outcome.is_ok(), self.retention);
        outcome
    }
}

/// Run the extraction transaction over any [`EntrySource`].
///
/// Prepares `dest_dir` (creating it, or reusing it when empty), writes every
/// entry in order, then verifies the file count. When `deadline` passes
/// before all entries are written the loop is abandoned and treated as an
/// incomplete extraction.
///
/// # Errors
///
/// See [`PackageExtractor::extract`]. Every error other than
/// [`ExtractionError::DestinationNotEmpty`] is returned after `dest_dir` has
/// been removed.
pub fn extract_entries(
    source: &mut dyn EntrySource,
    dest_dir: &Path,
    deadline: Option<Instant>,
) -> Result<ExtractionResult> {
    prepare_destination(dest_dir)?;

    let outcome = write_entries(source, dest_dir, deadline);
    match &outcome {
        Ok(result) => info!(
            "extracted {} files into {}",
            result.files_written,
            dest_dir.display()
        ),
        Err(err) => {
            warn!("extraction into {} failed: {err}", dest_dir.display());
            rollback(dest_dir);
        }
    }
    outcome
}

fn prepare_destination(dest_dir: &Path) -> Result<()> {
    match fs::read_dir(dest_dir) {
        Ok(mut existing) => {
            if existing.next().is_some() {
                return Err(ExtractionError::DestinationNotEmpty {
                    path: dest_dir.to_path_buf(),
                });
            }
            debug!("reusing empty destination {}", dest_dir.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir_all(dest_dir)
            .map_err(|err| ExtractionError::corrupt(dest_dir.display().to_string(), err)),
        Err(err) => Err(ExtractionError::corrupt(
            dest_dir.display().to_string(),
            err,
        )),
    }
}

fn write_entries(
    source: &mut dyn EntrySource,
    dest_dir: &Path,
    deadline: Option<Instant>,
) -> Result<ExtractionResult> {
    let entries = source
        .entries()
        .map_err(|err| ExtractionError::corrupt("archive index", err))?;
    let expected = expected_file_count(&entries);
    debug!(
        "archive declares {expected} files across {} entries",
        entries.len()
    );

    let mut written_files = 0;
    for (index, entry) in entries.iter().enumerate() {
        if deadline.is_some_and(|limit| Instant::now() >= limit) {
            warn!("extraction deadline passed after {written_files} of {expected} files");
            return Err(ExtractionError::IncompleteExtraction {
                expected,
                actual: written_files,
            });
        }

        let relative = normalise_entry_path(&entry.path)?;
        let target = dest_dir.join(&relative);
        match entry.kind {
            EntryKind::Directory => fs::create_dir_all(&target)
                .map_err(|err| ExtractionError::corrupt(entry.path.as_str(), err))?,
            EntryKind::File => {
                if relative.as_os_str().is_empty() {
                    return Err(ExtractionError::corrupt(
                        entry.path.as_str(),
                        "entry has no file name",
                    ));
                }
                extract_file(source, index, entry, &target)?;
                written_files += 1;
            }
        }
    }

    let actual = count_files(dest_dir).map_err(|err| {
        warn!("failed to count extracted files: {err}");
        ExtractionError::IncompleteExtraction {
            expected,
            actual: written_files,
        }
    })?;
    verify_file_count(expected, actual)?;

    Ok(ExtractionResult {
        destination: dest_dir.to_path_buf(),
        files_written: actual,
    })
}

fn extract_file(
    source: &mut dyn EntrySource,
    index: usize,
    entry: &ArchiveEntry,
    target: &Path,
) -> Result<()> {
    let mut reader = source
        .open(index)
        .map_err(|err| ExtractionError::corrupt(entry.path.as_str(), err))?;
    let written = write_synced(reader.as_mut(), target)
        .map_err(|err| ExtractionError::corrupt(entry.path.as_str(), err))?;
    verify_written_entry(entry, written)?;
    debug!("extracted {} ({written} bytes)", entry.path);
    Ok(())
}

/// Stream `reader` into a new file at `target`, returning once the data has
/// reached storage.
fn write_synced(reader: &mut dyn Read, target: &Path) -> io::Result<u64> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(target)?;
    let written = io::copy(reader, &mut file)?;
    file.flush()?;
    file.sync_all()?;
    Ok(written)
}

/// Remove a partially extracted destination. Already-missing directories
/// are fine; other failures are logged and do not mask the original error.
fn rollback(dest_dir: &Path) {
    match fs::remove_dir_all(dest_dir) {
        Ok(()) => info!("rolled back partial extraction at {}", dest_dir.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            "failed to roll back partial extraction at {}: {err}",
            dest_dir.display()
        ),
    }
}

fn settle_archive(archive_path: &Path, succeeded: bool, retention: ArchiveRetention) {
    if !succeeded && retention == ArchiveRetention::KeepOnFailure {
        debug!("keeping archive {} after failure", archive_path.display());
        return;
    }
    match fs::remove_file(archive_path) {
        Ok(()) => debug!("removed archive {}", archive_path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(
            "failed to remove archive {}: {err}",
            archive_path.display()
        ),
    }
}
