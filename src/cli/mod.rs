// src/cli/mod.rs
//! Command-line interface definitions and dispatch

pub mod actions;

use crate::config::StrutConfig;
use crate::server;
use crate::supervisor::Role;
use crate::utils::errors::Result;
use crate::utils::paths;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Toolchain wrapper and universal server for web projects.
#[derive(Parser, Debug)]
#[command(name = "strut")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a strut config file.
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v for debug, -vv for trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint JS files in the ./src directory.
    Lint,

    /// Lint stylesheets in the ./src directory.
    LintStyle,

    /// Start the universal server for development.
    Dev,

    /// Create a production build.
    Build,

    /// Run the project's test suite.
    Test,

    /// Start a prototype dev server.
    Proto,
}

/// Load configuration honoring the `-C` override
fn load_config(cli: &Cli) -> Result<StrutConfig> {
    let config = match &cli.config {
        Some(path) => StrutConfig::load_from(path)?,
        None => StrutConfig::load()?,
    };
    debug!("configuration loaded: {:?}", config);
    Ok(config)
}

/// Dispatch one parsed command line
///
/// `role` is the process role detected at startup; only the dev server
/// cares, every other command runs as a plain single process.
pub async fn execute(cli: Cli, role: Role) -> Result<ExitCode> {
    // Commands only make sense from the project root
    paths::ensure_project_root(&std::env::current_dir()?)?;

    let config = load_config(&cli)?;

    let code = match cli.command {
        Commands::Lint => actions::lint(&config).await?,
        Commands::LintStyle => actions::lint_style(&config).await?,
        Commands::Test => actions::test(&config).await?,
        Commands::Build => actions::build(&config).await?,
        Commands::Dev => {
            server::run(&config, role).await?;
            0
        }
        Commands::Proto => {
            server::run_proto(&config).await?;
            0
        }
    };

    Ok(ExitCode::from(code.clamp(0, 255) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_subcommands() {
        for (argv, expected_quiet) in [
            (vec!["strut", "lint"], false),
            (vec!["strut", "test", "--quiet"], true),
        ] {
            let cli = Cli::try_parse_from(argv).unwrap();
            assert_eq!(cli.quiet, expected_quiet);
        }
    }

    #[test]
    fn test_parse_subcommand_table() {
        assert!(matches!(
            Cli::try_parse_from(["strut", "lint"]).unwrap().command,
            Commands::Lint
        ));
        assert!(matches!(
            Cli::try_parse_from(["strut", "lint-style"]).unwrap().command,
            Commands::LintStyle
        ));
        assert!(matches!(
            Cli::try_parse_from(["strut", "dev"]).unwrap().command,
            Commands::Dev
        ));
        assert!(matches!(
            Cli::try_parse_from(["strut", "build"]).unwrap().command,
            Commands::Build
        ));
        assert!(matches!(
            Cli::try_parse_from(["strut", "test"]).unwrap().command,
            Commands::Test
        ));
        assert!(matches!(
            Cli::try_parse_from(["strut", "proto"]).unwrap().command,
            Commands::Proto
        ));
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::try_parse_from(["strut", "dev", "-C", "custom.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
    }

    #[test]
    fn test_missing_subcommand_fails() {
        assert!(Cli::try_parse_from(["strut"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["strut", "lint", "-v", "-q"]).is_err());
    }
}
