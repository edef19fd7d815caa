//! Logging setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` takes precedence over
//! the configured default filter.

use std::str::FromStr;

use evdash_domain::{DashError, Result};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Output format of the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable, for development consoles
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl FromStr for LogFormat {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(DashError::Config(format!("Unknown log format: {other}"))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Filter used when `RUST_LOG` is unset
    pub default_filter: String,
    /// Log span open/close, useful to time fetches
    pub enable_spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "info".to_string(),
            enable_spans: cfg!(debug_assertions),
        }
    }
}

impl LoggingConfig {
    pub fn json() -> Self {
        Self { format: LogFormat::Json, enable_spans: false, ..Self::default() }
    }
}

/// Install the global subscriber with the default configuration for `format`.
///
/// # Errors
/// Returns `DashError::Config` when a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    init(LoggingConfig { format, ..LoggingConfig::default() })
}

/// Install the global subscriber.
///
/// # Errors
/// Returns `DashError::Config` when a global subscriber is already set.
pub fn init(config: LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    // NEW and CLOSE only; ENTER fires on every re-poll of an awaited future.
    let span_events =
        if config.enable_spans { FmtSpan::NEW | FmtSpan::CLOSE } else { FmtSpan::NONE };

    let layer = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_span_events(span_events)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_target(true)
            .with_span_events(span_events)
            .with_ansi(false)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| DashError::Config(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::info!(format = ?config.format, "Logging initialized");
    Ok(())
}
