//! Configuration loading
//!
//! Reads the platform config document from YAML, JSON or TOML and resolves
//! `${ENV}` references before deserialising it.

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_document, load_from_file, load_from_str, probe_config_paths, ConfigFormat,
    CONFIG_PATH_ENV,
};
