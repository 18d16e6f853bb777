//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Load a `.env` file if one exists (`dotenvy`)
//! 2. Use `AEP_CONFIG_PATH` when it is set
//! 3. Otherwise probe the standard locations for a config file
//!
//! Every string scalar may reference environment variables as `${NAME}`.
//! A variable that is not set is replaced by its own name.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./aep_config.{yaml,yml,json,toml}` (current working directory)
//! 2. The same names in the parent and grandparent directories
//! 3. Relative to executable location

use std::path::{Path, PathBuf};

use aep_core::Substitutions;
use aep_domain::{AepError, PlatformConfig, Result};
use serde_json::Value;

use crate::errors::InfraError;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "AEP_CONFIG_PATH";

const CONFIG_FILE_NAMES: [&str; 4] =
    ["aep_config.yaml", "aep_config.yml", "aep_config.json", "aep_config.toml"];

/// Supported config document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension. Files without an extension
    /// are read as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("yaml") {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            other => Err(AepError::Config(format!("Unsupported config format: {other}"))),
        }
    }
}

/// Load configuration from the standard locations.
///
/// # Errors
/// Returns `AepError::Config` if no config file can be found or the file
/// is invalid.
pub fn load() -> Result<PlatformConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(AepError::Config(format!("Failed to load .env file: {e}"))),
    }

    let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
    load_from_file(path)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations with
/// [`probe_config_paths`].
///
/// # Errors
/// Returns `AepError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<PlatformConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AepError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AepError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let format = ConfigFormat::from_path(&config_path)?;
    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;
    load_from_str(&contents, format)
}

/// Parse configuration from string content, resolving `${ENV}` references.
///
/// # Errors
/// Returns `AepError::Config` if the document is invalid or required
/// fields are missing.
pub fn load_from_str(contents: &str, format: ConfigFormat) -> Result<PlatformConfig> {
    let document = parse_document(contents, format)?;
    let document = Substitutions::from_env().apply(document)?;
    serde_json::from_value(document).map_err(|e| AepError::Config(format!("Invalid config: {e}")))
}

/// Read a resource definition file and substitute `${NAME}` references.
///
/// Used for request bodies kept next to the code, such as dataset or
/// scheduled query definitions with per-deployment values.
pub fn load_document(path: &Path, substitutions: &Substitutions) -> Result<Value> {
    let format = ConfigFormat::from_path(path)?;
    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    substitutions.apply(parse_document(&contents, format)?)
}

/// Parse a document of any supported format into a JSON value.
pub(crate) fn parse_document(contents: &str, format: ConfigFormat) -> Result<Value> {
    let value: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(InfraError::from)?,
        ConfigFormat::Json => serde_json::from_str(contents).map_err(InfraError::from)?,
        ConfigFormat::Toml => toml::from_str(contents).map_err(InfraError::from)?,
    };
    Ok(value)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}
