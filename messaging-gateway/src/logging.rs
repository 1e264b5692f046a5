//! Logging setup for applications embedding the gateway
//!
//! The gateway only emits `tracing` events. Applications that do not install
//! their own subscriber can use this module to get one configured for the
//! environment they run in.

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Environment variable selecting the logging mode for [`init_logging_from_env`]
pub const LOG_MODE_ENV: &str = "GATEWAY_LOG_MODE";

/// Environment variable overriding the log level filter
pub const LOG_LEVEL_ENV: &str = "GATEWAY_LOG_LEVEL";

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with thread ids and source locations
    Debug,
}

impl std::str::FromStr for LoggingMode {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "silent" => Ok(LoggingMode::Silent),
            "development" => Ok(LoggingMode::Development),
            "debug" => Ok(LoggingMode::Debug),
            other => Err(LoggingError::InvalidEnv(format!(
                "{}={} (expected silent, development or debug)",
                LOG_MODE_ENV, other
            ))),
        }
    }
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install a global subscriber for `mode`
///
/// Call once, early. A second call fails with [`LoggingError::TracingInit`]
/// unless the mode is `Silent`.
///
/// ```rust,ignore
/// messaging_gateway::logging::init_logging(LoggingMode::Development)?;
/// ```
///
/// `GATEWAY_LOG_LEVEL` takes precedence over `RUST_LOG` when both are set.
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Install a subscriber chosen by `GATEWAY_LOG_MODE`
///
/// Unset means `Silent`. An unrecognised value is an error rather than a
/// silent fallback.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var(LOG_MODE_ENV) {
        Ok(value) => value.parse()?,
        Err(std::env::VarError::NotPresent) => LoggingMode::Silent,
        Err(e) => return Err(LoggingError::InvalidEnv(format!("{}: {}", LOG_MODE_ENV, e))),
    };

    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var(LOG_LEVEL_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{}: {}", directives, e)))
}

/// Whether a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}
