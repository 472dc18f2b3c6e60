use super::load_config;
use labgen_core::config::loader::default_config_path;
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    let rc = load_config(config, profile, "doctor");

    println!("OK   labgen doctor");
    println!(
        "path: {}",
        config.map_or_else(|| default_config_path().display().to_string(), |p| p.display().to_string())
    );
    println!("profile: {}", rc.active_profile);
    println!("project_root: {}", rc.project_root.display());
    println!("templates_dir: {}", rc.templates_dir.display());
    println!("data_dir: {}", rc.data_dir.display());
    println!("output_dir: {}", rc.output_dir.display());
    println!("figures_dir: {}", rc.figures_dir.display());
    println!("expansion.max_depth: {}", rc.expansion.max_depth);
    println!("logging.level: {}", rc.logging.level);

    for (label, dir) in [("templates_dir", &rc.templates_dir), ("data_dir", &rc.data_dir)] {
        if !dir.is_dir() {
            println!("warning: {label} does not exist yet");
        }
    }
}
