// src/observability/mod.rs
//! Tracing and logging initialization
//!
//! Log filtering follows `STRUT_LOG` if set, falling back to `RUST_LOG`,
//! falling back to the level implied by the CLI verbosity flags.

use crate::utils::errors::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive applied when no environment filter is set
fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "strut=error";
    }
    match verbosity {
        0 => "strut=info",
        1 => "strut=debug",
        _ => "strut=trace",
    }
}

/// Initialize the global tracing subscriber
///
/// Safe to call once per process; workers call it again in their own
/// address space after the fork-equivalent re-exec.
pub fn init_tracing(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = std::env::var("STRUT_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_directive(verbosity, quiet).to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0, false), "strut=info");
        assert_eq!(default_directive(1, false), "strut=debug");
        assert_eq!(default_directive(2, false), "strut=trace");
        assert_eq!(default_directive(5, false), "strut=trace");
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(default_directive(3, true), "strut=error");
    }
}
