//! Logging setup.

use env_logger::Builder;
use std::env;

const DEFAULT_FILTER: &str = "info";

/// Resolves the log filter, `RUST_LOG` if set, otherwise `info`.
pub fn log_filter<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUST_LOG")
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Loads `.env` into the process environment, then initializes env_logger,
/// so a `RUST_LOG` kept in `.env` takes effect.
pub fn setup_logging() {
    dotenv::dotenv().ok();

    Builder::new()
        .parse_filters(&log_filter(|key| env::var(key).ok()))
        .init();
}
