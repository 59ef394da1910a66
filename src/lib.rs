// src/lib.rs
//! Strut
//!
//! Toolchain wrapper and clustered universal server for web projects.
//!
//! # Architecture
//!
//! The crate is structured into several key modules:
//!
//! - **cli**: subcommand definitions and dispatch to external tools
//! - **config**: layered project configuration
//! - **supervisor**: worker pool, process spawning, restart policy
//! - **server**: universal server (coordinator/worker) and proto server
//! - **observability**: tracing setup
//! - **utils**: errors, paths, and helpers

// Public module exports
pub mod cli;
pub mod config;
pub mod observability;
pub mod server;
pub mod supervisor;
pub mod utils;

// Re-export commonly used types
pub use config::StrutConfig;
pub use supervisor::{ProcessSpawner, Role, WorkerEvent, WorkerId, WorkerPool, WorkerState};
pub use utils::errors::{Result, StrutError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Build information
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_info() {
        let info = BuildInfo::current();
        assert!(!info.version.is_empty());
    }
}
