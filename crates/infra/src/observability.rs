//! Tracing subscriber setup
//!
//! The SDK only emits `tracing` events; installing a subscriber is left to
//! the application. These helpers cover the common case.

use tracing_subscriber::EnvFilter;

/// Output format of [`init_tracing_with`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install a global `fmt` subscriber with human-readable output.
///
/// `RUST_LOG` takes precedence over `default_filter` (e.g.
/// `"zeropush_core=debug"`). Returns `false` if a global subscriber was
/// already installed; calling this more than once is harmless.
pub fn init_tracing(default_filter: &str) -> bool {
    init_tracing_with(default_filter, LogFormat::Text)
}

pub fn init_tracing_with(default_filter: &str, format: LogFormat) -> bool {
    let filter = env_filter(default_filter);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "Tracing subscriber installed");
    }
    installed
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}
