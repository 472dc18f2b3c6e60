use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
project_root  = "/tmp/labs"
templates_dir = "{{project_root}}/templates"
data_dir      = "{{project_root}}/data"
output_dir    = "{{project_root}}/out"

[expansion]
max_depth = 12
"#;
    write_file(&cfg, toml);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("labgen"));
    cmd.args(["doctor", "--config", cfg.to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   labgen doctor"))
        .stdout(predicate::str::contains("profile: default"))
        .stdout(predicate::str::contains("project_root: /tmp/labs"))
        .stdout(predicate::str::contains("figures_dir: /tmp/labs/out/figures"))
        .stdout(predicate::str::contains("expansion.max_depth: 12"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("labgen").join("config.toml");
    write_file(
        &cfg_path,
        r#"
version = 1
[profiles.default]
project_root  = "/tmp/labs"
templates_dir = "{{project_root}}/t"
data_dir      = "{{project_root}}/d"
output_dir    = "{{project_root}}/o"
"#,
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("labgen"));
    cmd.env("XDG_CONFIG_HOME", tmp.path());
    cmd.arg("doctor");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("OK   labgen doctor"))
        .stdout(predicate::str::contains("templates_dir: /tmp/labs/t"));
}
