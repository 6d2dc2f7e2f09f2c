use std::path::Path;

use crate::config::schema::RunConfig;
use crate::error::ConfigError;

/// Loads a run configuration from a `.json`, `.yaml` or `.yml` file and
/// validates it. Missing fields take their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    let config = match extension {
        "json" => load_config_from_json(&content)?,
        "yaml" | "yml" => load_config_from_yaml(&content)?,
        other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
    };
    Ok(config)
}

pub fn load_config_from_json(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig = serde_json::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_config_from_yaml(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig = serde_yaml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.worker_count == 0 {
        return Err(ConfigError::Validation {
            message: "worker_count must be at least 1".to_string(),
        });
    }

    for (name, path) in [
        ("catalog_path", &config.catalog_path),
        ("input_directory", &config.input_directory),
        ("output_path", &config.output_path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation {
                message: format!("{} must not be empty", name),
            });
        }
    }

    if config.extensions.is_empty() {
        return Err(ConfigError::Validation {
            message: "extensions must list at least one extension".to_string(),
        });
    }
    for ext in &config.extensions {
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(ConfigError::Validation {
                message: format!("extension '{}' must look like '.txt'", ext),
            });
        }
    }

    Ok(())
}
