// src/cli/actions.rs
//! External tool actions
//!
//! lint, lint-style, test, and build all work the same way: resolve the
//! configured tool binary from PATH, run it with the action's arguments,
//! and hand its exit code back to the caller. strut adds nothing on top
//! of the tools it wraps.

use crate::config::StrutConfig;
use crate::utils::errors::{Result, StrutError};
use tokio::process::Command;
use tracing::{debug, info};

/// Resolve and run one external tool, returning its exit code
async fn run_tool(name: &str, args: &[&str]) -> Result<i32> {
    let binary = which::which(name).map_err(|_| StrutError::ToolNotFound(name.to_string()))?;
    debug!("resolved {} to {}", name, binary.display());

    info!("running {} {}", name, args.join(" "));
    let status = Command::new(binary)
        .args(args)
        .status()
        .await
        .map_err(|e| StrutError::SpawnFailed(format!("failed to run {}: {}", name, e)))?;

    // Killed by signal: report failure the way a shell would
    Ok(status.code().unwrap_or(1))
}

/// Lint JS sources under `src/`
pub async fn lint(config: &StrutConfig) -> Result<i32> {
    run_tool(&config.tools.lint, &["src"]).await
}

/// Lint stylesheets
pub async fn lint_style(config: &StrutConfig) -> Result<i32> {
    run_tool(&config.tools.lint_style, &["src/**/*.css"]).await
}

/// Run the project's test suite
pub async fn test(config: &StrutConfig) -> Result<i32> {
    run_tool(&config.tools.test, &[]).await
}

/// Produce a production build
pub async fn build(config: &StrutConfig) -> Result<i32> {
    run_tool(&config.tools.build, &["--mode", "production"]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_reported() {
        let err = run_tool("definitely-not-a-real-tool-9z", &[]).await.unwrap_err();
        assert!(matches!(err, StrutError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_exit_code_is_propagated() {
        // `false` is POSIX-guaranteed to exit 1
        let code = run_tool("false", &[]).await.unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn test_success_exit_code() {
        let code = run_tool("true", &[]).await.unwrap();
        assert_eq!(code, 0);
    }
}
