//! Logging setup using tracing_subscriber.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

static VITALS_LOG_ENV_VAR: &str = "VITALS_LOG";

/// Crates whose level follows `VITALS_LOG` unless `RUST_LOG` names them.
const VITALS_CRATES: &[&str] = &["vitals", "vitals_cli"];

/// Initializes a tracing subscriber writing to stderr.
///
/// `--verbose` raises the default level from `info` to `debug`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    let directive_string = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let mut env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(&directive_string);

    let log_level =
        std::env::var(VITALS_LOG_ENV_VAR).unwrap_or_else(|_| default_level.to_string());

    for crate_name in VITALS_CRATES {
        if directive_string.contains(&format!("{crate_name}=")) {
            continue;
        }
        match format!("{crate_name}={log_level}").parse() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring invalid {}: {}", VITALS_LOG_ENV_VAR, e),
        }
    }

    env_filter
}
