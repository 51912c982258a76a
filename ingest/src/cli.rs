//! CLI argument definitions for the `coursepack` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration. Flags are the last configuration layer: each subcommand's
//! `apply_to` overrides only the settings given on the command line.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use coursepack_common::IngestConfig;
use log::LevelFilter;

/// Ingest and resolve SCORM course packages.
#[derive(Parser, Debug)]
#[command(name = "coursepack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Ingest and resolve SCORM course packages.\n\n",
    "An uploaded ZIP archive is extracted into its own folder under the content ",
    "root. Extraction either completes and is verified, or the folder is removed ",
    "again. The package's imsmanifest.xml is then resolved into the ordered list ",
    "of launchable items with their launch URLs.\n\n",
    "Settings come from built-in defaults, then coursepack.toml (or --config), ",
    "then COURSEPACK_CONTENT_ROOT and COURSEPACK_URL_PREFIX, then flags.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Ingest an upload into ./uploads:\n",
    "    $ coursepack ingest incoming/1700000000000-safety.zip\n\n",
    "  Resolve an extracted package as JSON:\n",
    "    $ coursepack resolve uploads/1700000000000-safety --json\n\n",
    "  Remove an ingested package:\n",
    "    $ coursepack remove 1700000000000-safety\n",
))]
pub struct Cli {
    /// Configuration file [default: coursepack.toml when present].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract an uploaded archive and resolve its manifest.
    Ingest(IngestArgs),

    /// Resolve the manifest of an already extracted package.
    Resolve(ResolveArgs),

    /// Remove an ingested package from the content root.
    Remove(RemoveArgs),
}

/// Arguments for the ingest command.
#[derive(Parser, Debug, Clone, Default)]
pub struct IngestArgs {
    /// The uploaded ZIP archive.
    #[arg(value_name = "ARCHIVE")]
    pub archive: Utf8PathBuf,

    /// Directory holding extracted packages.
    #[arg(long, value_name = "DIR")]
    pub content_root: Option<Utf8PathBuf>,

    /// Prefix prepended to launch URLs.
    #[arg(long, value_name = "PREFIX")]
    pub url_prefix: Option<String>,

    /// Keep the archive when extraction fails.
    #[arg(long)]
    pub keep_archive: bool,

    /// Abandon extraction after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output the resolved package as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the resolve command.
#[derive(Parser, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// The extracted package directory.
    #[arg(value_name = "DIR")]
    pub dir: Utf8PathBuf,

    /// Prefix prepended to launch URLs.
    #[arg(long, value_name = "PREFIX")]
    pub url_prefix: Option<String>,

    /// Output the resolved package as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the remove command.
#[derive(Parser, Debug, Clone, Default)]
pub struct RemoveArgs {
    /// Folder name of the package under the content root.
    #[arg(value_name = "FOLDER")]
    pub folder: String,

    /// Directory holding extracted packages.
    #[arg(long, value_name = "DIR")]
    pub content_root: Option<Utf8PathBuf>,
}

impl Cli {
    /// Returns the log level implied by `-q` and `-v`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use coursepack_ingest::cli::Cli;
    /// use log::LevelFilter;
    ///
    /// let cli = Cli::parse_from(["coursepack", "-vv", "resolve", "uploads/demo"]);
    /// assert_eq!(cli.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl IngestArgs {
    /// Applies the flags given on the command line to `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: IngestConfig) -> IngestConfig {
        if let Some(root) = &self.content_root {
            config.content_root.clone_from(root);
        }
        if let Some(prefix) = &self.url_prefix {
            config.url_prefix.clone_from(prefix);
        }
        if self.keep_archive {
            config.remove_archive_on_failure = false;
        }
        if self.timeout.is_some() {
            config.extraction_timeout_secs = self.timeout;
        }
        config
    }
}

impl ResolveArgs {
    /// Applies the flags given on the command line to `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: IngestConfig) -> IngestConfig {
        if let Some(prefix) = &self.url_prefix {
            config.url_prefix.clone_from(prefix);
        }
        config
    }
}

impl RemoveArgs {
    /// Applies the flags given on the command line to `config`.
    #[must_use]
    pub fn apply_to(&self, mut config: IngestConfig) -> IngestConfig {
        if let Some(root) = &self.content_root {
            config.content_root.clone_from(root);
        }
        config
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
