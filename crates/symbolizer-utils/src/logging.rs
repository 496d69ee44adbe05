//! # Logging Utilities
//!
//! Logging infrastructure built on `tracing-subscriber`.
//!
//! - Pretty output for development, JSON for machines
//! - Filtering through `RUST_LOG`
//! - Optional daily-rolled log file next to the console output
//! - File-only mode for hosts that own stdout/stderr
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use symbolizer_utils::init_logging;
//!
//! // Keep the guard alive for as long as events should reach the log file.
//! let _guard = init_logging().expect("Failed to initialize logging");
//! tracing::info!("Application started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: filter (e.g. `RUST_LOG=debug`, `RUST_LOG=symbolizer_core=trace`)
//! - `SYMBOLIZER_LOG_FORMAT`: `pretty` (default) or `json`
//! - `SYMBOLIZER_LOG_FILE`: optional log file path, rolled daily
//!
//! Console output goes to stderr so that stdout stays free for results.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs, io};

use chrono::Utc;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Keeps the background log file writer alive.
///
/// Dropping the guard flushes pending events. Console-only logging holds no
/// writer, but the guard is returned all the same.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard
{
    _file_writer: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// Reads `RUST_LOG`, `SYMBOLIZER_LOG_FORMAT`, and `SYMBOLIZER_LOG_FILE`.
///
/// ## Errors
///
/// Returns an error if:
/// - A global subscriber is already installed
/// - `SYMBOLIZER_LOG_FORMAT` is not a known format
/// - The log file directory cannot be created
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = match env::var("SYMBOLIZER_LOG_FORMAT") {
        Ok(value) => LogFormat::from_str(&value).map_err(LoggingError::InvalidFormat)?,
        Err(_) => LogFormat::Pretty,
    };

    // RUST_LOG may hold a full directive list; a plain level doubles as default
    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    let log_file = env::var("SYMBOLIZER_LOG_FILE").ok().map(PathBuf::from);
    init_logging_internal(format, default_level, log_file.as_deref())
}

/// Initialize console logging with an explicit level and format
///
/// `RUST_LOG` still refines the filter when set.
///
/// ## Example
///
/// ```rust,no_run
/// use symbolizer_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    init_logging_internal(format, level.into(), None)
}

/// Initialize file-only logging (nothing on stdout/stderr)
///
/// For hosts that own the terminal, such as an embedding scripting runtime.
/// Events go to `<directory>/YYYY-MM-DD-symbolizer.log`; `directory`
/// defaults to `~/.symbolizer`, or the system temp directory when `HOME` is
/// unset. An explicit `level` wins over `RUST_LOG`.
///
/// Returns the log file path together with the guard.
///
/// ## Errors
///
/// Returns an error if the directory cannot be created or a global
/// subscriber is already installed.
pub fn init_file_logging(
    directory: Option<&Path>,
    level: Option<LogLevel>,
) -> Result<(PathBuf, LoggingGuard), LoggingError>
{
    let directory = match directory {
        Some(directory) => directory.to_path_buf(),
        None => default_log_directory(),
    };
    fs::create_dir_all(&directory)?;

    let today = Utc::now().format("%Y-%m-%d");
    let file_name = format!("{today}-symbolizer.log");
    let log_file = directory.join(&file_name);

    let filter = match level {
        Some(level) => EnvFilter::new(Level::from(level).to_string()),
        None => env_filter(Level::INFO),
    };

    // The date is already in the name, so the appender never rolls.
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(&directory, &file_name));
    Registry::default()
        .with(vec![file_layer(LogFormat::Pretty, writer, filter)])
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok((
        log_file,
        LoggingGuard {
            _file_writer: Some(guard),
        },
    ))
}

fn default_log_directory() -> PathBuf
{
    match env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".symbolizer"),
        Err(_) => env::temp_dir(),
    }
}

/// `RUST_LOG` when it parses, `default_level` otherwise.
fn env_filter(default_level: Level) -> EnvFilter
{
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()))
}

fn init_logging_internal(
    format: LogFormat,
    default_level: Level,
    log_file: Option<&Path>,
) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![console_layer(format, env_filter(default_level))];
    let mut file_writer = None;

    if let Some(path) = log_file {
        let file_name = path
            .file_name()
            .ok_or_else(|| LoggingError::InvalidFile(path.display().to_string()))?;
        let directory = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(directory)?;

        let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, file_name));
        layers.push(file_layer(format, writer, env_filter(default_level)));
        file_writer = Some(guard);
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn console_layer(format: LogFormat, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking, filter: EnvFilter) -> BoxedLayer
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_ansi(false) // No ANSI in files
            .with_filter(filter)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(filter)
            .boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Log file path has no file name component
    #[error("Invalid log file path: {0}")]
    InvalidFile(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}
