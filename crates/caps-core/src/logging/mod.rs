//! Structured logging for the caps CLI.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSON lines for automation
//!
//! stdout is reserved for command payloads; all log output goes to stderr.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown by default.
const LOG_TARGETS: &[&str] = &["caps", "caps_core", "caps_config", "caps_common"];

/// Build the event filter.
///
/// `RUST_LOG` wins when set; otherwise every workspace crate logs at
/// `config.level`.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives = LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, config.level))
            .collect::<Vec<_>>()
            .join(",");
        EnvFilter::new(directives)
    })
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs. Later calls
/// are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}
