pub mod doctor;
pub mod list_commands;
pub mod list_templates;
pub mod list_vars;
pub mod render;

use crate::logging;
use crate::plotting::SvgChartRenderer;
use labgen_core::config::loader::{default_config_path, ConfigLoader};
use labgen_core::config::types::ResolvedConfig;
use labgen_core::discovery::load_sources;
use labgen_core::{LabContext, Limits};
use std::path::Path;

/// Load the configuration and start logging, or report and exit.
pub fn load_config(config: Option<&Path>, profile: Option<&str>, name: &str) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            logging::init(&rc.logging);
            rc
        }
        Err(e) => {
            println!("FAIL labgen {name}");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

/// Build a render context holding every template and data source of the
/// profile, or report and exit.
pub fn load_context(rc: &ResolvedConfig, name: &str) -> LabContext {
    let ctx = match LabContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            println!("FAIL labgen {name}");
            println!("{e}");
            std::process::exit(1);
        }
    };
    let mut ctx = ctx
        .with_limits(Limits { max_depth: rc.expansion.max_depth })
        .with_renderer(Box::new(SvgChartRenderer::new(&rc.figures_dir)));

    if let Err(e) = load_sources(&mut ctx, &rc.templates_dir, &rc.data_dir) {
        println!("FAIL labgen {name}");
        println!("{e}");
        std::process::exit(1);
    }
    ctx
}
