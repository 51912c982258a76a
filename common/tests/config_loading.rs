//! Integration tests for layered configuration loading.

use camino::Utf8PathBuf;
use coursepack_common::{CONTENT_ROOT_ENV, IngestConfig, URL_PREFIX_ENV};
use logtest::Logger;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn config_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

fn write_config(dir: &TempDir, contents: &str) -> Utf8PathBuf {
    let path = Utf8PathBuf::try_from(dir.path().join("coursepack.toml")).expect("UTF-8 path");
    std::fs::write(&path, contents).expect("write config");
    path
}

#[rstest]
fn loads_explicit_file_from_disk(config_dir: TempDir) {
    let path = write_config(
        &config_dir,
        "content_root = \"/srv/courses\"\nextraction_timeout_secs = 5\n",
    );

    let config = IngestConfig::load(Some(&path)).expect("load config");

    assert_eq!(config.content_root.as_str(), "/srv/courses");
    assert_eq!(config.url_prefix, "/uploads/");
    assert_eq!(config.extraction_timeout_secs, Some(5));
}

#[rstest]
fn environment_overrides_file_values(config_dir: TempDir) {
    let path = write_config(
        &config_dir,
        "content_root = \"/srv/courses\"\nurl_prefix = \"/courses/\"\n",
    );

    let config = temp_env::with_vars(
        [
            (CONTENT_ROOT_ENV, Some("/mnt/packages")),
            (URL_PREFIX_ENV, None),
        ],
        || {
            IngestConfig::load(Some(&path))
                .expect("load config")
                .with_process_environment()
        },
    );

    assert_eq!(config.content_root.as_str(), "/mnt/packages");
    assert_eq!(config.url_prefix, "/courses/");
}

#[rstest]
fn malformed_file_is_rejected(config_dir: TempDir) {
    let path = write_config(&config_dir, "content_root = [unterminated\n");

    let result = IngestConfig::load(Some(&path));

    let err = result.expect_err("malformed TOML should fail");
    assert!(err.to_string().contains("invalid configuration file"));
}

#[test]
fn missing_default_file_is_logged() {
    let mut logger = Logger::start();

    let config = IngestConfig::load_with(None, |_| {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "absent"))
    })
    .expect("defaults");
    assert_eq!(config, IngestConfig::default());

    let mut logged = false;
    while let Some(record) = logger.pop() {
        if record.args().to_string().contains("using default configuration") {
            logged = true;
            break;
        }
    }
    assert!(logged, "expected fallback to defaults to be logged");
}
