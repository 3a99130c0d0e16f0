//! Structured logging for the chooser.
//!
//! Provides dual-mode logging on stderr:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for batch-system log collection
//!
//! # Usage
//!
//! ```ignore
//! use gmx_chooser::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::from_env(None, None);
//! init_logging(&config);
//! tracing::debug!(event = event_names::PROBE_DONE, tokens = 42, "read flags");
//! ```
//!
//! stdout is never written by logging: an entry point hands stdout to the
//! launched program, and the operator CLI reserves it for its payload.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel, ENV_LOG_FORMAT, ENV_LOG_LEVEL};
pub use events::{event_names, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise the configured level
/// for this crate.
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gmx_chooser={}", config.level)))
}

/// Initialize the logging subsystem.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi)
                .without_time();
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init();
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init();
        }
    }
}

/// Initialize logging from the environment alone (entry-point mode).
pub fn init_default_logging() {
    init_logging(&LogConfig::from_env(None, None));
}
