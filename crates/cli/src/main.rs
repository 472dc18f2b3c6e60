mod cmd;
mod logging;
mod plotting;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "labgen", version, about = "Render lab-report sources into LaTeX")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// List templates defined under templates_dir
    ListTemplates(ListArgs),

    /// List tables, plots and figures defined under data_dir
    ListVars(ListArgs),

    /// List the built-in commands and their parameters
    ListCommands,

    /// Render source files into LaTeX
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Source files, or directories searched for `.lg` files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Write `.tex` files here instead of the profile's output_dir
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::ListTemplates(args) => cmd::list_templates::run(config, profile, args.json),
        Commands::ListVars(args) => cmd::list_vars::run(config, profile, args.json),
        Commands::ListCommands => cmd::list_commands::run(),
        Commands::Render(args) => {
            cmd::render::run(config, profile, &args.inputs, args.output_dir.as_deref())
        }
    }
    Ok(())
}
