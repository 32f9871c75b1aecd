use std::path::Path;

use crate::config::schema::ClientConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.base_url.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "base_url must not be empty".to_string(),
        });
    }

    if config.attendance_poll_interval_ms == 0 || config.document_poll_interval_ms == 0 {
        return Err(ConfigError::Validation {
            message: "poll intervals must be greater than zero".to_string(),
        });
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "request_timeout_secs must be greater than zero".to_string(),
        });
    }

    Ok(())
}
