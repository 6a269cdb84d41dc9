//! Configuration resolution tests for dossier-intake
//!
//! Uses serial_test because the tests change DOSSIER_* environment variables.

use dossier_common::config::{CONFIG_PATH_ENV, MAX_UPLOAD_BYTES_ENV};
use dossier_intake::config::{build_validator, resolve_config, CliOverrides};
use dossier_intake::types::DOCX_MIME;
use dossier_intake::{IntakeError, UploadCandidate, UploadError};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    env::remove_var(CONFIG_PATH_ENV);
    env::remove_var(MAX_UPLOAD_BYTES_ENV);
}

#[test]
#[serial]
fn test_cli_max_upload_overrides_file_and_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dossier.toml");
    fs::write(&path, "[intake]\nmax_upload_bytes = 5000\n").unwrap();
    env::set_var(MAX_UPLOAD_BYTES_ENV, "6000");

    let overrides = CliOverrides {
        config_path: Some(path),
        max_upload_bytes: Some(7000),
    };
    let config = resolve_config(&overrides).unwrap();
    assert_eq!(config.intake.max_upload_bytes, 7000);

    clear_env();
}

#[test]
#[serial]
fn test_cli_zero_upload_limit_rejected() {
    clear_env();
    let overrides = CliOverrides {
        config_path: None,
        max_upload_bytes: Some(0),
    };
    assert!(resolve_config(&overrides).is_err());
}

#[test]
#[serial]
fn test_configured_limit_reaches_validator() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dossier.toml");
    fs::write(&path, "[intake]\nmax_upload_bytes = 100\nrequired_slots = [1]\n").unwrap();

    let config = resolve_config(&CliOverrides {
        config_path: Some(path),
        max_upload_bytes: None,
    })
    .unwrap();
    let mut validator = build_validator(&config);
    assert!(!validator.can_submit());

    let err = validator
        .add(UploadCandidate::new("Anlage_1.docx", 101, DOCX_MIME))
        .unwrap_err();
    assert!(matches!(
        err,
        IntakeError::Upload(UploadError::FileTooLarge { size: 101, max: 100 })
    ));

    validator
        .add(UploadCandidate::new("Anlage_1.docx", 100, DOCX_MIME))
        .unwrap();
    assert!(validator.can_submit());
}
