//! Structured logging setup.
//!
//! One call to [`init_logging`] at process start wires `tracing` with an env
//! filter and either JSON or pretty output. Filtering follows `RUST_LOG` when
//! set, otherwise `JOBRELAY_LOG_LEVEL` (default `info`); the output format
//! follows `JOBRELAY_LOG_FORMAT` (`json` or `pretty`, default `pretty`).

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per record, for log pipelines.
    Json,
    /// Human-readable multi-line output, for development.
    Pretty,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("JOBRELAY_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Default level when `RUST_LOG` is unset.
    pub log_level: String,
    /// Include file/line in records.
    pub include_location: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            format: LogFormat::from_env(),
            log_level: std::env::var("JOBRELAY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            include_location: false,
        }
    }
}

/// Initialize logging from the environment.
pub fn init_logging() -> Result<()> {
    init_logging_with_config(&LogConfig::from_env())
}

/// Initialize logging with an explicit configuration.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}
