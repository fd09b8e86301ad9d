//! Build configuration files.
//!
//! The format follows the file extension: `.toml`, `.yaml`/`.yml` or
//! `.json`. Files with any other extension are tried as TOML, then YAML,
//! then JSON. A relative `existing_networks` path is resolved against the
//! directory holding the configuration file.

use gridplan_algo::BuildConfig;
use gridplan_core::{GridplanError, GridplanResult};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(Self::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Self::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            _ => None,
        }
    }
}

pub fn parse_config(data: &str, format: ConfigFormat) -> GridplanResult<BuildConfig> {
    let parsed: Result<BuildConfig, String> = match format {
        ConfigFormat::Toml => toml::from_str(data).map_err(|err| err.to_string()),
        ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|err| err.to_string()),
        ConfigFormat::Json => serde_json::from_str(data).map_err(|err| err.to_string()),
    };
    let config =
        parsed.map_err(|err| GridplanError::Config(format!("parsing {format:?} config: {err}")))?;
    config.validate()?;
    Ok(config)
}

/// Read, parse and validate a configuration file.
pub fn load_config(path: &Path) -> GridplanResult<BuildConfig> {
    let data = fs::read_to_string(path).map_err(|err| {
        GridplanError::Config(format!("reading config '{}': {err}", path.display()))
    })?;
    let mut config = match ConfigFormat::from_path(path) {
        Some(format) => parse_config(&data, format)?,
        None => parse_config(&data, ConfigFormat::Toml)
            .or_else(|_| parse_config(&data, ConfigFormat::Yaml))
            .or_else(|_| parse_config(&data, ConfigFormat::Json))?,
    };
    if let (Some(existing), Some(base)) = (&config.network.existing_networks, path.parent()) {
        if existing.is_relative() {
            let resolved = base.join(existing);
            debug!(path = %resolved.display(), "resolved existing network path");
            config.network.existing_networks = Some(resolved);
        }
    }
    Ok(config)
}
