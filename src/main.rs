// src/main.rs
//! strut binary entry point
//!
//! Parses the command line, initializes tracing, detects the process
//! role (coordinator by default, worker when spawned by a coordinator),
//! and dispatches.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use strut::cli::{execute, Cli};
use strut::supervisor::Role;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = strut::observability::init_tracing(cli.verbose, cli.quiet) {
        eprintln!("failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Workers are re-execs of the original command line with the role
    // flag set; the role decides behavior, never ambient state deeper in.
    let role = Role::from_env();
    Ok(execute(cli, role).await?)
}
