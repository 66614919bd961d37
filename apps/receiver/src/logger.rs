//! Logging for the receiver process.
//!
//! Provides colored stdout output plus an optional plain log file, with
//! thread-safe one-time initialization.

use crate::error::ReceiverAppError;

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::io::stdout;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "joystick-receiver.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Initialize the logger.
///
/// Always logs to stdout. When `log_dir` is given, also appends to
/// `{log_dir}/joystick-receiver.log`, creating the directory if needed.
///
/// Safe to call multiple times: later calls log a warning and return `Ok`.
///
/// # Errors
///
/// Returns [`ReceiverAppError::Logger`] if:
/// - The log directory or file cannot be created
/// - Another global logger is already installed
pub fn initialize(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), ReceiverAppError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(level, log_dir);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
            if let Some(dir) = log_dir {
                info!("Log file: {}", dir.join(LOG_FILE_NAME).display());
            }
        }
    });

    result
}

#[track_caller]
fn initialize_internal(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), ReceiverAppError> {
    build_dispatch(level, log_dir)?
        .apply()
        .map_err(|e| ReceiverAppError::Logger {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })
}

/// Build the stdout (and optional file) dispatch without installing it.
#[track_caller]
pub(crate) fn build_dispatch(
    level: LevelFilter,
    log_dir: Option<&Path>,
) -> Result<Dispatch, ReceiverAppError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let mut base_dispatch = Dispatch::new().level(level);

    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .chain(stdout());

    base_dispatch = base_dispatch.chain(stdout_dispatch);

    if let Some(dir) = log_dir {
        create_dir_all(dir).map_err(|e| ReceiverAppError::Logger {
            message: format!("Failed to create log directory {}: {e}", dir.display()),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;

        let log_file = fern::log_file(dir.join(LOG_FILE_NAME)).map_err(|e| {
            ReceiverAppError::Logger {
                message: format!("Failed to create log file: {e}"),
                location: ErrorLocation::from(std::panic::Location::caller()),
            }
        })?;

        let file_dispatch = Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0)
                ))
            })
            .chain(log_file);

        base_dispatch = base_dispatch.chain(file_dispatch);
    }

    Ok(base_dispatch)
}
