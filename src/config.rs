//! User configuration (`config.toml`).
//!
//! Problems never stop startup: they come back as warnings and the affected
//! settings fall back to defaults.

use cohort_core::ExportFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 65_536; // 64 KiB

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub export: ExportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Where `:export` writes when no directory is given.
    pub directory: Option<PathBuf>,
    /// `csv` or `xlsx`.
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub directory: Option<PathBuf>,
}

impl Config {
    pub fn export_format(&self) -> ExportFormat {
        self.export
            .format
            .as_deref()
            .and_then(|name| ExportFormat::parse(name).ok())
            .unwrap_or_default()
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Load the config from `explicit`, or from the user config dir.
///
/// A missing default file is silent; a missing explicit file is a warning.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let config = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            Config::default()
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => parse_config(&content, &path, &mut warnings),
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                Config::default()
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            Config::default()
        }
    };

    (config, warnings)
}

fn parse_config(content: &str, path: &Path, warnings: &mut Vec<String>) -> Config {
    let mut config = match toml::from_str::<Config>(content) {
        Ok(config) => config,
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", path.display(), err));
            return Config::default();
        }
    };

    if let Some(name) = config.export.format.as_deref()
        && let Err(err) = ExportFormat::parse(name)
    {
        warnings.push(format!("{} in {}; using csv", err, path.display()));
        config.export.format = None;
    }
    config
}

pub fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cohort")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
