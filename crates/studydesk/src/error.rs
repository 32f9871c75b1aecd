use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StudydeskError {
    #[error("API error: {0}")]
    Api(#[from] crate::api::ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Document error: {0}")]
    Document(#[from] crate::documents::DocumentError),

    #[error("Quiz error: {0}")]
    Quiz(#[from] crate::quiz::QuizError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No user config directory available on this platform")]
    NoConfigDir,

    #[error("Failed to read session file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write session file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StudydeskError>;
