//! Optional logging setup for applications that have none of their own.
//!
//! The library only emits `tracing` events (file creation, loads, saves and
//! rejected values). Call [`init`] once at startup to print them to stderr.

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log level '{level}': {message}")]
    InvalidLevel { level: String, message: String },

    #[error("failed to set subscriber: {0}")]
    Subscriber(String),
}

/// Initialise the global tracing subscriber.
///
/// `level` is any `EnvFilter` directive, usually one of `"error"`, `"warn"`,
/// `"info"`, `"debug"` or `"trace"`. With `prefer_level`, `level` wins and
/// `RUST_LOG` is only the fallback when `level` is invalid; otherwise
/// `RUST_LOG` wins and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), LoggerError> {
    let filter = if prefer_level {
        match EnvFilter::try_new(level) {
            Ok(filter) => filter,
            Err(level_err) => {
                EnvFilter::try_from_default_env().map_err(|env_err| LoggerError::InvalidLevel {
                    level: level.to_string(),
                    message: format!("{level_err}; RUST_LOG parse failed: {env_err}"),
                })?
            }
        }
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| LoggerError::InvalidLevel {
                level: level.to_string(),
                message: e.to_string(),
            })?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggerError::Subscriber(e.to_string()))?;

    Ok(())
}

/// Parse a single level name into a [`LevelFilter`].
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    if level.is_empty() {
        return Err(LoggerError::InvalidLevel {
            level: String::new(),
            message: "log level must not be empty".into(),
        });
    }
    level
        .parse::<LevelFilter>()
        .map_err(|e| LoggerError::InvalidLevel {
            level: level.to_string(),
            message: e.to_string(),
        })
}
