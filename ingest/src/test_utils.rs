//! Shared test utilities for the ingest crate.
//!
//! Exposed to integration tests through the `test-support` feature.

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::archive::{ArchiveEntry, EntrySource};

/// One entry of a ZIP fixture.
#[derive(Clone, Copy, Debug)]
pub enum ZipFixtureEntry<'a> {
    /// A file with the given path and content.
    File(&'a str, &'a [u8]),
    /// A directory marker. The path should end with `/`.
    Directory(&'a str),
}

/// Writes a ZIP archive containing `entries`, in order, to `path`.
///
/// # Errors
///
/// Returns an I/O error when the archive cannot be written.
pub fn write_zip(path: &Path, entries: &[ZipFixtureEntry<'_>]) -> io::Result<()> {
    let mut writer = ZipWriter::new(File::create(path)?);
    let options = SimpleFileOptions::default();
    for entry in entries {
        match *entry {
            ZipFixtureEntry::File(name, content) => {
                writer.start_file(name, options).map_err(io::Error::other)?;
                writer.write_all(content)?;
            }
            ZipFixtureEntry::Directory(name) => {
                writer
                    .add_directory(name, options)
                    .map_err(io::Error::other)?;
            }
        }
    }
    writer.finish().map_err(io::Error::other)?;
    Ok(())
}

/// In-memory [`EntrySource`] for driving the extraction loop with entry
/// lists no real archive tool would produce.
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: Vec<ArchiveEntry>,
    contents: Vec<Option<Vec<u8>>>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file whose declared size matches its content.
    #[must_use]
    pub fn with_file(self, path: &str, content: &[u8]) -> Self {
        let size = u64::try_from(content.len()).unwrap_or(u64::MAX);
        self.with_declared_file(path, size, content)
    }

    /// Adds a file declaring `size` bytes while yielding `content`.
    #[must_use]
    pub fn with_declared_file(mut self, path: &str, size: u64, content: &[u8]) -> Self {
        self.entries.push(ArchiveEntry::file(path, size));
        self.contents.push(Some(content.to_vec()));
        self
    }

    /// Adds a file that fails to open.
    #[must_use]
    pub fn with_unreadable_file(mut self, path: &str, size: u64) -> Self {
        self.entries.push(ArchiveEntry::file(path, size));
        self.contents.push(None);
        self
    }

    /// Adds a directory marker.
    #[must_use]
    pub fn with_directory(mut self, path: &str) -> Self {
        self.entries.push(ArchiveEntry::directory(path));
        self.contents.push(None);
        self
    }
}

impl EntrySource for MemorySource {
    fn entries(&mut self) -> io::Result<Vec<ArchiveEntry>> {
        Ok(self.entries.clone())
    }

    fn open(&mut self, index: usize) -> io::Result<Box<dyn Read + '_>> {
        match self.contents.get(index) {
            Some(Some(content)) => Ok(Box::new(Cursor::new(content.as_slice()))),
            Some(None) => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "invalid compressed data",
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no entry at index {index}"),
            )),
        }
    }
}

/// Wraps resources and organizations in a manifest root declaring the
/// usual SCORM namespaces.
#[must_use]
pub fn manifest_xml(organizations: &str, resources: &str) -> String {
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<manifest identifier=\"course\" version=\"1\"\n",
            "    xmlns=\"http://www.imsglobal.org/xsd/imscp_v1p1\"\n",
            "    xmlns:adlcp=\"http://www.adlnet.org/xsd/adlcp_v1p3\"\n",
            "    xmlns:imsss=\"http://www.imsglobal.org/xsd/imsss\">\n",
            "  {organizations}\n",
            "  <resources>\n{resources}\n  </resources>\n",
            "</manifest>\n",
        ),
        organizations = organizations,
        resources = resources,
    )
}

/// Builds an `<organizations>` block with an optional `default` attribute.
#[must_use]
pub fn organizations_xml(default: Option<&str>, organizations: &[String]) -> String {
    let default = default
        .map(|id| format!(" default=\"{id}\""))
        .unwrap_or_default();
    format!(
        "<organizations{default}>\n{}\n  </organizations>",
        organizations.join("\n")
    )
}

/// Builds one `<organization>` with a title and the given item markup.
#[must_use]
pub fn organization_xml(identifier: &str, items: &[String]) -> String {
    format!(
        "    <organization identifier=\"{identifier}\">\n      <title>{identifier}</title>\n{}\n    </organization>",
        items.join("\n")
    )
}

/// Builds an `<item>` referencing `identifierref`, optionally titled.
#[must_use]
pub fn item_xml(identifier: &str, identifierref: &str, title: Option<&str>) -> String {
    let title = title
        .map(|text| format!("<title>{text}</title>"))
        .unwrap_or_default();
    format!(
        "      <item identifier=\"{identifier}\" identifierref=\"{identifierref}\">{title}</item>"
    )
}

/// Builds a `<resource>` carrying an `adlcp:scormType` attribute.
#[must_use]
pub fn resource_xml(identifier: &str, href: &str, scorm_type: &str) -> String {
    format!(
        "    <resource identifier=\"{identifier}\" type=\"webcontent\" adlcp:scormType=\"{scorm_type}\" href=\"{href}\"/>"
    )
}
