//! Layered configuration for package ingestion.
//!
//! Settings are resolved from four layers, lowest precedence first: built-in
//! defaults, an optional `coursepack.toml` file, the `COURSEPACK_*`
//! environment variables, and finally command-line flags (applied by the
//! binary). Each layer only overrides the keys it actually sets.
//!
//! The loader accepts an injected file reader and environment lookup so that
//! tests can exercise every layer without touching the real process state.

use std::io;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// File name probed in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "coursepack.toml";

/// Environment variable overriding [`IngestConfig::content_root`].
pub const CONTENT_ROOT_ENV: &str = "COURSEPACK_CONTENT_ROOT";

/// Environment variable overriding [`IngestConfig::url_prefix`].
pub const URL_PREFIX_ENV: &str = "COURSEPACK_URL_PREFIX";

/// Errors arising while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration file {path}")]
    Read {
        /// Path of the file that failed to load.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML or contains unknown keys.
    #[error("invalid configuration file {path}: {reason}")]
    Parse {
        /// Path of the rejected file.
        path: Utf8PathBuf,
        /// Description of the parse failure.
        reason: String,
    },
}

/// Settings consumed by the ingestion pipeline.
///
/// # Examples
///
/// ```
/// use coursepack_common::IngestConfig;
///
/// let config = IngestConfig::default();
/// assert_eq!(config.url_prefix, "/uploads/");
/// assert!(config.remove_archive_on_failure);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Directory that holds one sub-directory per extracted package.
    pub content_root: Utf8PathBuf,
    /// Prefix prepended to every launch URL. The static file server must
    /// expose `content_root` under this same prefix.
    pub url_prefix: String,
    /// Whether the uploaded archive is deleted when extraction fails. The
    /// archive is always deleted after a verified success.
    pub remove_archive_on_failure: bool,
    /// Optional deadline for the whole extraction loop, in seconds.
    pub extraction_timeout_secs: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            content_root: Utf8PathBuf::from("uploads"),
            url_prefix: String::from("/uploads/"),
            remove_archive_on_failure: true,
            extraction_timeout_secs: None,
        }
    }
}

impl IngestConfig {
    /// Loads configuration from `explicit`, or from [`DEFAULT_CONFIG_FILE`]
    /// when it exists in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when an explicitly named file cannot be
    /// read, and [`ConfigError::Parse`] when a file is not valid TOML.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        Self::load_with(explicit, |path| std::fs::read_to_string(path))
    }

    /// Loads configuration using the supplied file reader.
    ///
    /// A missing default file is not an error: the built-in defaults are used
    /// instead. A missing explicit file is reported.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    ///
    /// # Examples
    ///
    /// ```
    /// use coursepack_common::IngestConfig;
    ///
    /// let config = IngestConfig::load_with(None, |_| {
    ///     Ok(String::from("url_prefix = \"/content/\""))
    /// })
    /// .expect("valid configuration");
    /// assert_eq!(config.url_prefix, "/content/");
    /// ```
    pub fn load_with<F>(explicit: Option<&Utf8Path>, read: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> io::Result<String>,
    {
        let path = explicit.unwrap_or_else(|| Utf8Path::new(DEFAULT_CONFIG_FILE));
        match read(path) {
            Ok(raw) => Self::from_toml_str(&raw, path),
            Err(err) if explicit.is_none() && err.kind() == io::ErrorKind::NotFound => {
                debug!("no {DEFAULT_CONFIG_FILE} found; using default configuration");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses a TOML document. `path` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(raw: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }

    /// Applies `COURSEPACK_*` overrides using the supplied lookup.
    ///
    /// Blank values are ignored so that an exported-but-empty variable does
    /// not wipe out a configured setting.
    #[must_use]
    pub fn with_environment<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(CONTENT_ROOT_ENV) {
            if let Some(value) = normalise_value(Some(&root)) {
                debug!("content root overridden by {CONTENT_ROOT_ENV}");
                self.content_root = Utf8PathBuf::from(value);
            }
        }
        if let Some(prefix) = lookup(URL_PREFIX_ENV) {
            if let Some(value) = normalise_value(Some(&prefix)) {
                debug!("URL prefix overridden by {URL_PREFIX_ENV}");
                value.clone_into(&mut self.url_prefix);
            }
        }
        self
    }

    /// Applies overrides from the process environment.
    #[must_use]
    pub fn with_process_environment(self) -> Self {
        self.with_environment(|key| std::env::var(key).ok())
    }

    /// Returns the extraction deadline as a [`Duration`], if configured.
    #[must_use]
    pub fn extraction_timeout(&self) -> Option<Duration> {
        self.extraction_timeout_secs.map(Duration::from_secs)
    }
}

/// Trim whitespace and discard empty values.
#[must_use]
pub fn normalise_value(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(raw: &str) -> Result<IngestConfig, ConfigError> {
        IngestConfig::from_toml_str(raw, Utf8Path::new("coursepack.toml"))
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse("").expect("empty TOML is valid");
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn parses_every_key() {
        let config = parse(concat!(
            "content_root = \"/srv/courses\"\n",
            "url_prefix = \"/courses/\"\n",
            "remove_archive_on_failure = false\n",
            "extraction_timeout_secs = 30\n",
        ))
        .expect("valid configuration");

        assert_eq!(config.content_root.as_str(), "/srv/courses");
        assert_eq!(config.url_prefix, "/courses/");
        assert!(!config.remove_archive_on_failure);
        assert_eq!(config.extraction_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = parse("upload_limit = 50\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let config = IngestConfig::load_with(None, |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "absent"))
        })
        .expect("defaults");
        assert_eq!(config, IngestConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_reported() {
        let result = IngestConfig::load_with(Some(Utf8Path::new("custom.toml")), |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "absent"))
        });
        match result {
            Err(ConfigError::Read { path, .. }) => assert_eq!(path.as_str(), "custom.toml"),
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_path_is_passed_to_reader() {
        let config = IngestConfig::load_with(Some(Utf8Path::new("site.toml")), |path| {
            assert_eq!(path.as_str(), "site.toml");
            Ok(String::from("content_root = \"site\""))
        })
        .expect("valid configuration");
        assert_eq!(config.content_root.as_str(), "site");
    }

    #[rstest]
    #[case::both(Some("/data"), Some("/static/"), "/data", "/static/")]
    #[case::root_only(Some("/data"), None, "/data", "/uploads/")]
    #[case::blank_ignored(Some("   "), Some(""), "uploads", "/uploads/")]
    fn environment_overrides(
        #[case] root: Option<&str>,
        #[case] prefix: Option<&str>,
        #[case] expected_root: &str,
        #[case] expected_prefix: &str,
    ) {
        let config = IngestConfig::default().with_environment(|key| match key {
            CONTENT_ROOT_ENV => root.map(str::to_owned),
            URL_PREFIX_ENV => prefix.map(str::to_owned),
            _ => None,
        });
        assert_eq!(config.content_root.as_str(), expected_root);
        assert_eq!(config.url_prefix, expected_prefix);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("  /x/ "), Some("/x/"))]
    fn normalise_value_trims(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(normalise_value(input), expected);
    }
}
