// src/utils/errors.rs
//! Error types for strut

use thiserror::Error;

/// Main error type for strut operations
#[derive(Error, Debug)]
pub enum StrutError {
    /// Invalid configuration, fatal before anything is spawned
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to spawn a worker or tool process
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(String),

    /// An external tool binary could not be resolved
    #[error("Tool '{0}' not found in PATH. Is it installed in this project?")]
    ToolNotFound(String),

    /// Server-side failure (bind, accept, response build)
    #[error("Server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for strut operations
pub type Result<T> = std::result::Result<T, StrutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = StrutError::Configuration("pool size must be at least 1".into());
        assert!(err.to_string().contains("pool size"));
    }

    #[test]
    fn test_tool_not_found_display() {
        let err = StrutError::ToolNotFound("eslint".into());
        assert!(err.to_string().contains("eslint"));
    }
}
