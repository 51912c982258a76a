//! Unit tests for ingestion pipeline orchestration.
//!
//! Extraction is mocked so that these tests exercise folder naming,
//! resolution hand-off and error propagation without building archives. One
//! end-to-end test drives the real `ZipExtractor`.

use super::{IngestOutcome, extractor_for, ingest, ingest_with, remove_package, validate_package_name};
use crate::archive::extraction::MockPackageExtractor;
use crate::archive::{ArchiveRetention, ExtractionError, ExtractionResult};
use crate::error::IngestError;
use crate::manifest::{MANIFEST_FILE_NAME, ResolutionError};
use crate::test_utils::{
    ZipFixtureEntry, item_xml, manifest_xml, organization_xml, organizations_xml, resource_xml,
    write_zip,
};
use camino::{Utf8Path, Utf8PathBuf};
use coursepack_common::IngestConfig;
use rstest::{fixture, rstest};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct TestContext {
    _temp: TempDir,
    root: Utf8PathBuf,
    config: IngestConfig,
}

#[fixture]
fn ctx() -> TestContext {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp path");
    let config = IngestConfig {
        content_root: root.join("uploads"),
        ..IngestConfig::default()
    };
    TestContext {
        _temp: temp,
        root,
        config,
    }
}

fn sample_manifest() -> String {
    manifest_xml(
        &organizations_xml(
            None,
            &[organization_xml(
                "org-1",
                &[item_xml("item-1", "res-1", Some("Welcome"))],
            )],
        ),
        &resource_xml("res-1", "index.html", "sco"),
    )
}

fn write_manifest(dest: &Path) -> ExtractionResult {
    fs::create_dir_all(dest).expect("create dest");
    fs::write(dest.join(MANIFEST_FILE_NAME), sample_manifest()).expect("write manifest");
    ExtractionResult {
        destination: dest.to_path_buf(),
        files_written: 1,
    }
}

#[rstest]
fn ingest_with_extracts_into_folder_and_resolves(ctx: TestContext) {
    let archive = ctx.root.join("1700-demo.zip");
    let mut mock = MockPackageExtractor::new();
    mock.expect_extract()
        .withf(|archive, dest| archive.ends_with("1700-demo.zip") && dest.ends_with("uploads/1700-demo"))
        .times(1)
        .returning(|_, dest| Ok(write_manifest(dest)));

    let outcome = ingest_with(&archive, &ctx.config, &mock).expect("ingest should succeed");

    assert_eq!(outcome.folder, "1700-demo");
    assert_eq!(outcome.destination, ctx.config.content_root.join("1700-demo"));
    assert_eq!(outcome.files_written, 1);
    assert_eq!(outcome.package.name, "demo");
    assert_eq!(
        outcome.package.items[0].launch_url,
        "/uploads/1700-demo/index.html"
    );
}

#[rstest]
fn ingest_with_strips_upper_case_extension(ctx: TestContext) {
    let archive = ctx.root.join("1700-demo.ZIP");
    let mut mock = MockPackageExtractor::new();
    mock.expect_extract()
        .withf(|_, dest| dest.ends_with("1700-demo"))
        .times(1)
        .returning(|_, dest| Ok(write_manifest(dest)));

    let outcome = ingest_with(&archive, &ctx.config, &mock).expect("ingest should succeed");

    assert_eq!(outcome.folder, "1700-demo");
}

#[rstest]
fn extraction_errors_propagate(ctx: TestContext) {
    let archive = ctx.root.join("1700-demo.zip");
    let mut mock = MockPackageExtractor::new();
    mock.expect_extract().times(1).returning(|_, _| {
        Err(ExtractionError::PathTraversal {
            path: "../evil.html".to_owned(),
        })
    });

    let result = ingest_with(&archive, &ctx.config, &mock);

    assert!(matches!(
        result,
        Err(IngestError::Extraction(ExtractionError::PathTraversal { .. }))
    ));
}

#[rstest]
fn resolution_failure_leaves_extracted_package(ctx: TestContext) {
    let archive = ctx.root.join("1700-demo.zip");
    let mut mock = MockPackageExtractor::new();
    mock.expect_extract().times(1).returning(|_, dest| {
        fs::create_dir_all(dest).expect("create dest");
        fs::write(dest.join("index.html"), "<html/>").expect("write");
        Ok(ExtractionResult {
            destination: dest.to_path_buf(),
            files_written: 1,
        })
    });

    let result = ingest_with(&archive, &ctx.config, &mock);

    assert!(matches!(
        result,
        Err(IngestError::Resolution(ResolutionError::ManifestMissing { .. }))
    ));
    assert!(ctx.config.content_root.join("1700-demo/index.html").exists());
}

#[rstest]
#[case::no_file_name("uploads/..")]
#[case::extension_only(".zip")]
fn unusable_archive_names_are_rejected_before_extraction(
    ctx: TestContext,
    #[case] archive: &str,
) {
    let mut mock = MockPackageExtractor::new();
    mock.expect_extract().never();

    let result = ingest_with(Utf8Path::new(archive), &ctx.config, &mock);

    assert!(matches!(
        result,
        Err(IngestError::InvalidPackageName { .. })
    ));
}

#[rstest]
fn ingest_runs_real_extraction_end_to_end(ctx: TestContext) {
    let manifest = sample_manifest();
    let archive = ctx.root.join("1700-demo.zip");
    write_zip(
        archive.as_std_path(),
        &[
            ZipFixtureEntry::File(MANIFEST_FILE_NAME, manifest.as_bytes()),
            ZipFixtureEntry::Directory("media/"),
            ZipFixtureEntry::File("index.html", b"<html>welcome</html>"),
        ],
    )
    .expect("write zip");

    let IngestOutcome {
        files_written,
        package,
        ..
    } = ingest(&archive, &ctx.config).expect("ingest should succeed");

    assert_eq!(files_written, 2);
    assert_eq!(package.item_count, 1);
    assert_eq!(package.items[0].title, "Welcome");
    assert!(!archive.exists(), "archive should be removed after success");
}

#[rstest]
#[case::remove(true, ArchiveRetention::RemoveOnFailure)]
#[case::keep(false, ArchiveRetention::KeepOnFailure)]
fn extractor_follows_configuration(
    #[case] remove_on_failure: bool,
    #[case] expected: ArchiveRetention,
) {
    let config = IngestConfig {
        remove_archive_on_failure: remove_on_failure,
        ..IngestConfig::default()
    };
    assert_eq!(extractor_for(&config).retention(), expected);
}

#[rstest]
fn remove_package_deletes_folder(ctx: TestContext) {
    let package_dir = ctx.config.content_root.join("1700-demo");
    fs::create_dir_all(package_dir.join("media")).expect("create package");
    fs::write(package_dir.join("media/clip.txt"), "clip").expect("write");

    let removed = remove_package(&ctx.config.content_root, "1700-demo").expect("remove");

    assert_eq!(removed, package_dir);
    assert!(!package_dir.exists());
}

#[rstest]
fn remove_package_reports_missing_folder(ctx: TestContext) {
    let result = remove_package(&ctx.config.content_root, "1700-absent");
    assert!(matches!(
        result,
        Err(IngestError::PackageNotFound { ref name, .. }) if name == "1700-absent"
    ));
}

#[rstest]
#[case::parent("..")]
#[case::current(".")]
#[case::empty("")]
#[case::nested("a/b")]
#[case::backslash("a\\b")]
fn remove_package_rejects_names_outside_root(ctx: TestContext, #[case] name: &str) {
    fs::create_dir_all(&ctx.config.content_root).expect("create root");

    let result = remove_package(&ctx.config.content_root, name);

    assert!(matches!(result, Err(IngestError::InvalidPackageName { .. })));
    assert!(ctx.config.content_root.exists());
}

#[rstest]
#[case::stamped("1700-demo")]
#[case::dotted("course.v2")]
#[case::dot_prefixed("..hidden")]
fn accepts_single_folder_names(#[case] name: &str) {
    assert!(validate_package_name(name).is_ok());
}
