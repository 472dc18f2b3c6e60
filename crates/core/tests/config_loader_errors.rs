use labgen_core::ErrorKind;
use labgen_core::config::loader::{ConfigError, ConfigLoader};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

const PROFILE: &str = r#"
[profiles.default]
project_root = "/tmp/labs"
templates_dir = "{{project_root}}/tpl"
data_dir      = "{{project_root}}/data"
output_dir    = "{{project_root}}/out"
"#;

#[test]
fn missing_file_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("nope/config.toml");
    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    match err {
        ConfigError::NotFound(_) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn bad_version_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 2\nprofiles = {}\n");

    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    match err {
        ConfigError::BadVersion(2) => {}
        other => panic!("expected BadVersion(2), got {other:?}"),
    }
}

#[test]
fn no_profiles_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = 1\nprofiles = {}\n");

    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    match err {
        ConfigError::NoProfiles => {}
        other => panic!("expected NoProfiles, got {other:?}"),
    }
}

#[test]
fn profile_not_found_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, &format!("version = 1\nprofile = \"default\"\n{PROFILE}"));

    let err = ConfigLoader::load(Some(&cfg_path), Some("missing")).unwrap_err();
    match err {
        ConfigError::ProfileNotFound(p) if p == "missing" => {}
        other => panic!("expected ProfileNotFound(\"missing\"), got {other:?}"),
    }
}

#[test]
fn malformed_toml_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, "version = = 1\n");

    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(..)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn zero_depth_limit_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, &format!("version = 1\n[expansion]\nmax_depth = 0\n{PROFILE}"));

    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    match err {
        ConfigError::InvalidLimit { name, value: 0, .. } => {
            assert_eq!(name, "expansion.max_depth");
        }
        other => panic!("expected InvalidLimit, got {other:?}"),
    }
}

#[test]
fn oversized_depth_limit_fails() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    write_file(&cfg_path, &format!("version = 1\n[expansion]\nmax_depth = 5000\n{PROFILE}"));

    let err = ConfigLoader::load(Some(&cfg_path), None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    match err {
        ConfigError::InvalidLimit { name, value: 5000, .. } => {
            assert_eq!(name, "expansion.max_depth");
        }
        other => panic!("expected InvalidLimit, got {other:?}"),
    }
}
