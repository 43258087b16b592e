//! Structured logging setup.
//!
//! Libraries in this workspace only emit `tracing` events; binaries call
//! [`init`] once to install a formatter.

#![warn(missing_docs, clippy::pedantic)]

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "FNWRAP_LOG";

/// Filter used when neither [`LOG_ENV`] nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the log filter.
///
/// Precedence: `explicit`, then [`LOG_ENV`], then `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. An unparsable directive falls back to the default.
#[must_use]
pub fn filter(explicit: Option<&str>) -> EnvFilter {
    let directive = explicit
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .or_else(|| std::env::var(EnvFilter::DEFAULT_ENV).ok())
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_owned());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a global `fmt` subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(explicit: Option<&str>) -> bool {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter(explicit))
        .try_init()
        .is_ok()
}
