//! Ingestion pipeline orchestration.
//!
//! Ties extraction and resolution together for one uploaded archive: derive
//! the package folder from the archive name, extract into the content root,
//! then resolve the extracted manifest. Also removes ingested packages.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use coursepack_common::{IngestConfig, package_folder_name};
use log::{info, warn};

use crate::archive::{ArchiveRetention, PackageExtractor, ZipExtractor};
use crate::error::{IngestError, Result};
use crate::manifest::{ResolvedPackage, resolve};

/// Result of ingesting one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    /// Folder name under the content root.
    pub folder: String,
    /// Directory the package was extracted into.
    pub destination: Utf8PathBuf,
    /// Number of files extracted and verified.
    pub files_written: usize,
    /// The resolved launchable structure.
    pub package: ResolvedPackage,
}

/// Builds the production extractor for `config`.
#[must_use]
pub fn extractor_for(config: &IngestConfig) -> ZipExtractor {
    ZipExtractor::new()
        .with_retention(ArchiveRetention::from_remove_flag(
            config.remove_archive_on_failure,
        ))
        .with_timeout(config.extraction_timeout())
}

/// Ingests the archive at `archive_path` using a [`ZipExtractor`] built from
/// `config`.
///
/// # Errors
///
/// See [`ingest_with`].
pub fn ingest(archive_path: &Utf8Path, config: &IngestConfig) -> Result<IngestOutcome> {
    ingest_with(archive_path, config, &extractor_for(config))
}

/// Ingests the archive at `archive_path` with the given extractor.
///
/// A resolution failure leaves the extracted package in place, since
/// resolution never writes to disk.
///
/// # Errors
///
/// Returns [`IngestError::InvalidPackageName`] when no usable folder name can
/// be derived from the archive name, [`IngestError::Extraction`] when the
/// extractor fails, and [`IngestError::Resolution`] when the manifest cannot
/// be resolved.
pub fn ingest_with(
    archive_path: &Utf8Path,
    config: &IngestConfig,
    extractor: &dyn PackageExtractor,
) -> Result<IngestOutcome> {
    let file_name = archive_path
        .file_name()
        .ok_or_else(|| IngestError::InvalidPackageName {
            name: archive_path.to_string(),
            reason: "archive path has no file name",
        })?;
    let folder = package_folder_name(file_name);
    validate_package_name(folder)?;

    let destination = config.content_root.join(folder);
    info!("ingesting {archive_path} into {destination}");
    let extraction = extractor.extract(archive_path.as_std_path(), destination.as_std_path())?;

    let package = resolve(destination.as_std_path(), &config.url_prefix).inspect_err(|err| {
        warn!("package extracted to {destination} but could not be resolved: {err}");
    })?;
    info!(
        "ingested {folder} with {} launchable items",
        package.item_count
    );

    Ok(IngestOutcome {
        folder: folder.to_owned(),
        destination,
        files_written: extraction.files_written,
        package,
    })
}

/// Removes a previously ingested package and returns the removed path.
///
/// # Errors
///
/// Returns [`IngestError::InvalidPackageName`] for names that are not a
/// single folder, [`IngestError::PackageNotFound`] when the folder does not
/// exist, and [`IngestError::Io`] when removal fails.
pub fn remove_package(content_root: &Utf8Path, folder: &str) -> Result<Utf8PathBuf> {
    validate_package_name(folder)?;
    let path = content_root.join(folder);
    match fs::remove_dir_all(&path) {
        Ok(()) => {
            info!("removed package {path}");
            Ok(path)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(IngestError::PackageNotFound {
            name: folder.to_owned(),
            root: content_root.to_path_buf(),
        }),
        Err(source) => Err(IngestError::Io {
            operation: "remove",
            path,
            source,
        }),
    }
}

/// Ensures `name` denotes exactly one folder directly below the content
/// root.
///
/// # Errors
///
/// Returns [`IngestError::InvalidPackageName`] when it does not.
pub fn validate_package_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name refers to a relative directory")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(IngestError::InvalidPackageName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
