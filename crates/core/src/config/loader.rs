use crate::config::types::{ConfigFile, ExpansionConfig, LoggingConfig, Profile, ResolvedConfig};
use crate::error::ErrorKind;
use crate::templates::MAX_DEPTH_CEILING;
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,

    #[error("invalid limit {name} = {value}: {reason}")]
    InvalidLimit { name: &'static str, value: usize, reason: &'static str },
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ReadError(..) => ErrorKind::Io,
            _ => ErrorKind::Config,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        let cf: ConfigFile = toml::from_str(&s)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        if cf.expansion.max_depth == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "expansion.max_depth",
                value: 0,
                reason: "must be at least 1",
            });
        }
        if cf.expansion.max_depth > MAX_DEPTH_CEILING {
            return Err(ConfigError::InvalidLimit {
                name: "expansion.max_depth",
                value: cf.expansion.max_depth,
                reason: "exceeds the supported maximum of 128",
            });
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        Self::resolve_profile(&active, prof, cf.expansion, &cf.logging)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        expansion: ExpansionConfig,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let project_root = expand_path(&prof.project_root)?;
        let sub = |s: &str| s.replace("{{project_root}}", &project_root.to_string_lossy());

        let templates_dir = expand_path(&sub(&prof.templates_dir))?;
        let data_dir = expand_path(&sub(&prof.data_dir))?;
        let output_dir = expand_path(&sub(&prof.output_dir))?;
        let figures_dir = match &prof.figures_dir {
            Some(dir) => expand_path(&sub(dir))?,
            None => output_dir.join("figures"),
        };

        // Resolve log file path if present
        let logging = if let Some(ref file) = log_cfg.file {
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expand_path(&sub(&file.to_string_lossy()))?),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            project_root,
            templates_dir,
            data_dir,
            output_dir,
            figures_dir,
            expansion,
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("labgen").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("labgen").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}
