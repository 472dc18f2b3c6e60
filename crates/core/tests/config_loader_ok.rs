use labgen_core::config::loader::ConfigLoader;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn load_default_profile_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
project_root = "/tmp/labs"
templates_dir = "{{project_root}}/templates"
data_dir      = "{{project_root}}/data"
output_dir    = "{{project_root}}/out"

[logging]
level = "debug"
file = "{{project_root}}/labgen.log"
"#;

    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), None).expect("should load");
    assert_eq!(rc.active_profile, "default");
    assert_eq!(rc.project_root.display().to_string(), "/tmp/labs");
    assert!(rc.templates_dir.ends_with("templates"));
    assert!(rc.data_dir.ends_with("data"));
    assert_eq!(rc.output_dir, PathBuf::from("/tmp/labs/out"));
    assert_eq!(rc.figures_dir, PathBuf::from("/tmp/labs/out/figures"));
    assert_eq!(rc.expansion.max_depth, 32);
    assert_eq!(rc.logging.level, "debug");
    assert_eq!(rc.logging.file, Some(PathBuf::from("/tmp/labs/labgen.log")));
}

#[test]
fn load_with_profile_override_ok() {
    let tmp = tempdir().unwrap();
    let cfg_path = tmp.path().join("labgen/config.toml");
    let toml = r#"
version = 1
profile = "default"

[profiles.default]
project_root = "/tmp/def"
templates_dir = "{{project_root}}/tpl"
data_dir      = "{{project_root}}/data"
output_dir    = "{{project_root}}/out"

[profiles.course]
project_root = "/tmp/course"
templates_dir = "{{project_root}}/tpl"
data_dir      = "{{project_root}}/data"
output_dir    = "{{project_root}}/out"
figures_dir   = "{{project_root}}/img"

[expansion]
max_depth = 8
"#;
    write_file(&cfg_path, toml);

    let rc = ConfigLoader::load(Some(&cfg_path), Some("course")).expect("should load");
    assert_eq!(rc.active_profile, "course");
    assert_eq!(rc.project_root.display().to_string(), "/tmp/course");
    assert_eq!(rc.figures_dir, PathBuf::from("/tmp/course/img"));
    assert_eq!(rc.expansion.max_depth, 8);
}
