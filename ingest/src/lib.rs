//! Course package ingestion library.
//!
//! This crate provides the core of the `coursepack` CLI: transactional
//! extraction of uploaded SCORM archives and resolution of their
//! `imsmanifest.xml` into an ordered list of launchable items. It can also be
//! consumed programmatically by an upload handler.
//!
//! # Modules
//!
//! - [`archive`] - Extraction with integrity checks and rollback
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Pipeline error type with per-kind exit codes
//! - [`manifest`] - Manifest parsing and launchable-item resolution
//! - [`output`] - Human-readable and JSON formatting
//! - [`pipeline`] - Ingest and remove orchestration

pub mod archive;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod output;
pub mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
