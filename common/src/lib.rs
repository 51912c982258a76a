//! Shared configuration and naming rules for the coursepack tools.
//!
//! The ingestion library and its command-line front end both need to agree on
//! where packages live, how launch URLs are prefixed, and how a package folder
//! is turned into the name shown to learners. Those rules live here so that
//! every consumer derives them the same way.

pub mod config;
pub mod naming;

pub use config::{
    CONTENT_ROOT_ENV, ConfigError, DEFAULT_CONFIG_FILE, IngestConfig, URL_PREFIX_ENV,
    normalise_value,
};
pub use naming::{ARCHIVE_EXTENSION, display_name, package_folder_name};
