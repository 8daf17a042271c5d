//! crates/logging/src/subscriber.rs
//! Global subscriber installation.
//!
//! The filter comes from [`LOG_ENV`] when that variable holds a valid
//! directive list, so `RDELTA_LOG=rdelta::delta=trace` narrows output to one
//! subsystem. Otherwise the [`Verbosity`] picked on the command line applies
//! to every rdelta target.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::verbosity::Verbosity;

/// Environment variable holding filter directives that override `-v`.
pub const LOG_ENV: &str = "RDELTA_LOG";

/// Installs a formatter writing to standard error.
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(verbosity: Verbosity) -> bool {
    install(verbosity, io::stderr, io::stderr().is_terminal())
}

/// Installs a formatter writing plain text to `writer`.
///
/// # Example
///
/// ```rust,ignore
/// use logging::{Verbosity, init_tracing_with_writer};
///
/// init_tracing_with_writer(Verbosity::Debug, std::io::stdout);
/// ```
pub fn init_tracing_with_writer<W>(verbosity: Verbosity, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    install(verbosity, writer, false)
}

fn install<W>(verbosity: Verbosity, writer: W, ansi: bool) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbosity))
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .without_time()
        .try_init()
        .is_ok()
}

fn filter(verbosity: Verbosity) -> EnvFilter {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(verbosity.directive()))
}
