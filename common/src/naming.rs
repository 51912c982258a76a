//! Naming rules for package folders and their human-facing names.
//!
//! Uploaded archives are stored as `<stamp>-<original name>.zip` and extracted
//! into a folder named after the archive without its extension. Learners see
//! only the part after the stamp.

/// Extension stripped from archive file names, compared case-insensitively.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Separator between the upload stamp and the original package name.
const NAME_SEPARATOR: char = '-';

/// Returns the display name for a package folder.
///
/// The name is the substring after the last `-`, or the whole folder name
/// when it contains none. A trailing `-` therefore yields an empty name.
///
/// # Examples
///
/// ```
/// use coursepack_common::display_name;
///
/// assert_eq!(display_name("1700000000000-demo"), "demo");
/// assert_eq!(display_name("safety"), "safety");
/// ```
#[must_use]
pub fn display_name(folder: &str) -> &str {
    folder
        .rsplit_once(NAME_SEPARATOR)
        .map_or(folder, |(_, tail)| tail)
}

/// Returns the folder name an archive is extracted into.
///
/// A trailing `.zip` is removed regardless of case; any other name is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use coursepack_common::package_folder_name;
///
/// assert_eq!(package_folder_name("1700-demo.ZIP"), "1700-demo");
/// assert_eq!(package_folder_name("notes.tar"), "notes.tar");
/// ```
#[must_use]
pub fn package_folder_name(archive_file_name: &str) -> &str {
    archive_file_name
        .len()
        .checked_sub(ARCHIVE_EXTENSION.len())
        .and_then(|split| {
            let stem = archive_file_name.get(..split)?;
            let extension = archive_file_name.get(split..)?;
            extension
                .eq_ignore_ascii_case(ARCHIVE_EXTENSION)
                .then_some(stem)
        })
        .unwrap_or(archive_file_name)
}
