use super::{load_config, load_context};
use labgen_core::discovery::{discover_sources, SourceKind};
use labgen_core::{LabContext, RenderError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum FileError {
    #[error("failed to read: {0}")]
    Read(#[source] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn run(
    config: Option<&Path>,
    profile: Option<&str>,
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
) {
    let rc = load_config(config, profile, "render");
    let ctx = load_context(&rc, "render");
    let output_dir = output_dir.unwrap_or(rc.output_dir.as_path());

    if let Err(e) = fs::create_dir_all(output_dir) {
        println!("FAIL labgen render");
        println!("failed to create {}: {e}", output_dir.display());
        std::process::exit(1);
    }

    let files = match collect_inputs(inputs) {
        Ok(files) => files,
        Err(e) => {
            println!("FAIL labgen render");
            println!("{e}");
            std::process::exit(1);
        }
    };

    let mut failed = 0usize;
    for file in &files {
        match render_file(&ctx, file, output_dir) {
            Ok(out) => println!("OK   {} -> {}", file.display(), out.display()),
            Err(e) => {
                failed += 1;
                match line_of(&e) {
                    Some(line) => println!("FAIL {}: {e} (line {line})", file.display()),
                    None => println!("FAIL {}: {e}", file.display()),
                }
            }
        }
    }

    info!(files = files.len(), failed, "render finished");
    println!("-- {} rendered, {failed} failed --", files.len() - failed);
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Expand directories into the `.lg` sources they contain.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, labgen_core::discovery::DiscoveryError> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(discover_sources(input, SourceKind::Documents)?.into_iter().map(|s| s.path));
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

fn render_file(ctx: &LabContext, file: &Path, output_dir: &Path) -> Result<PathBuf, FileError> {
    let text = fs::read_to_string(file).map_err(FileError::Read)?;
    let rendered = ctx.render(&text)?;

    let stem = file.file_stem().map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let path = output_dir.join(format!("{stem}.tex"));
    fs::write(&path, rendered).map_err(|source| FileError::Write { path: path.clone(), source })?;
    info!(source = %file.display(), output = %path.display(), "rendered");
    Ok(path)
}

fn line_of(e: &FileError) -> Option<usize> {
    match e {
        FileError::Render(r) => r.line(),
        _ => None,
    }
}
