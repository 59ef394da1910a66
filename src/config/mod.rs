// src/config/mod.rs
//! Project configuration
//!
//! Configuration is layered: built-in defaults, then an optional
//! `strut.toml` at the project root, then `STRUT_*` environment overrides
//! (e.g. `STRUT_SERVER__PORT=4000`, `STRUT_POOL__SIZE=8`).

use crate::utils::errors::Result;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration for all strut commands
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrutConfig {
    /// Universal server settings
    pub server: ServerConfig,

    /// Worker pool settings
    pub pool: PoolConfig,

    /// External tool commands
    pub tools: ToolsConfig,
}

/// Settings for the universal and prototype servers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Universal server port, shared by all workers
    pub port: u16,

    /// Prototype server port
    pub proto_port: u16,

    /// Directory served as static assets
    pub public_dir: String,

    /// Path to the bundler's asset manifest (JSON)
    pub assets_manifest: String,
}

/// Settings for the worker pool
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of worker processes; 0 means one per available CPU
    pub size: usize,
}

/// External tool commands the CLI dispatches to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// JS linter command
    pub lint: String,

    /// Style linter command
    pub lint_style: String,

    /// Test runner command
    pub test: String,

    /// Production bundler command
    pub build: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            proto_port: 3001,
            public_dir: "build/public".to_string(),
            assets_manifest: "build/publicAssets.json".to_string(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { size: 0 } // auto: one worker per CPU
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            lint: "eslint".to_string(),
            lint_style: "stylelint".to_string(),
            test: "jest".to_string(),
            build: "webpack".to_string(),
        }
    }
}

impl Default for StrutConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pool: PoolConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl StrutConfig {
    /// Load configuration from the default `strut.toml` location
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("strut.toml"))
    }

    /// Load configuration from an explicit file path
    ///
    /// The file is optional; environment overrides always apply.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("STRUT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Effective pool size: explicit value, or available CPU parallelism
    pub fn pool_size(&self) -> usize {
        if self.pool.size > 0 {
            self.pool.size
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = StrutConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.proto_port, 3001);
        assert_eq!(config.pool.size, 0);
        assert_eq!(config.tools.lint, "eslint");
        assert_eq!(config.tools.test, "jest");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = StrutConfig::load_from(Path::new("/nonexistent/strut.toml")).unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_file_overrides() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 4000\n\n[pool]\nsize = 2\n\n[tools]\nlint = \"oxlint\""
        )
        .unwrap();

        let config = StrutConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.pool.size, 2);
        assert_eq!(config.tools.lint, "oxlint");
        // Untouched sections keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.tools.test, "jest");
    }

    #[test]
    fn test_pool_size_auto_resolves_to_parallelism() {
        let config = StrutConfig::default();
        assert!(config.pool_size() >= 1);
    }

    #[test]
    fn test_pool_size_explicit() {
        let config = StrutConfig {
            pool: PoolConfig { size: 3 },
            ..Default::default()
        };
        assert_eq!(config.pool_size(), 3);
    }
}
