//! Finding and loading source files on disk.
//!
//! Template sources end in `.lgt`, data sources in `.lgd` and documents to
//! render in `.lg`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ErrorKind;
use crate::render::LabContext;
use crate::templates::TemplateError;
use crate::variables::StoreError;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("directory not found: {0}")]
    MissingDir(String),

    #[error("failed to walk {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("in template source {path}: {source}")]
    Template {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    #[error("in data source {path}: {source}")]
    Data {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

impl DiscoveryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingDir(_) | Self::WalkError(..) | Self::Read { .. } => ErrorKind::Io,
            Self::Template { source, .. } => source.kind(),
            Self::Data { source, .. } => source.kind(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Templates,
    Data,
    Documents,
}

impl SourceKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Templates => "lgt",
            Self::Data => "lgd",
            Self::Documents => "lg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the search root, without extension.
    pub logical_name: String,
    pub path: PathBuf,
}

/// All files of `kind` under `root`, sorted by logical name.
pub fn discover_sources(root: &Path, kind: SourceKind) -> Result<Vec<SourceFile>, DiscoveryError> {
    let root = root
        .canonicalize()
        .map_err(|_| DiscoveryError::MissingDir(root.display().to_string()))?;

    let mut out = Vec::new();

    for entry in WalkDir::new(&root) {
        let entry =
            entry.map_err(|e| DiscoveryError::WalkError(root.display().to_string(), e))?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(kind.extension())
        {
            continue;
        }

        let rel = path.strip_prefix(&root).unwrap_or(path);
        let logical_name = rel.with_extension("").to_string_lossy().replace('\\', "/");
        out.push(SourceFile { logical_name, path: path.to_path_buf() });
    }

    out.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
    Ok(out)
}

/// Counts of what [`load_sources`] defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub template_files: usize,
    pub templates: usize,
    pub data_files: usize,
    pub variables: usize,
}

/// Load every template source under `templates_dir` and every data source
/// under `data_dir` into `ctx`.
pub fn load_sources(
    ctx: &mut LabContext,
    templates_dir: &Path,
    data_dir: &Path,
) -> Result<LoadSummary, DiscoveryError> {
    let mut summary = LoadSummary::default();

    for file in discover_sources(templates_dir, SourceKind::Templates)? {
        let text = read(&file.path)?;
        let n = ctx
            .load_templates(&text)
            .map_err(|source| DiscoveryError::Template { path: file.path.clone(), source })?;
        debug!(source = %file.logical_name, templates = n, "loaded template source");
        summary.template_files += 1;
        summary.templates += n;
    }

    for file in discover_sources(data_dir, SourceKind::Data)? {
        let text = read(&file.path)?;
        let n = ctx
            .load_data(&text)
            .map_err(|source| DiscoveryError::Data { path: file.path.clone(), source })?;
        debug!(source = %file.logical_name, variables = n, "loaded data source");
        summary.data_files += 1;
        summary.variables += n;
    }

    info!(
        templates = summary.templates,
        variables = summary.variables,
        "sources loaded"
    );
    Ok(summary)
}

fn read(path: &Path) -> Result<String, DiscoveryError> {
    fs::read_to_string(path).map_err(|source| DiscoveryError::Read { path: path.to_path_buf(), source })
}
