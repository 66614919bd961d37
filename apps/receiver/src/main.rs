use joystick_receiver::error::ReceiverAppError;
use joystick_receiver::logger::initialize as LoggerInitialize;

use receiver_core::config::{ReceiverConfig, paths};
use receiver_core::control::{ControlState, LoggingActuator, spawn_actuator};
use receiver_core::receiver::start_receiver;

use common::ErrorLocation;

use std::panic::Location;

use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), ReceiverAppError> {
    let dotenv_path = paths::load_dotenv();
    let config_dir = paths::config_dir();

    // Logger is not up yet, keep the load failure to report it afterwards
    let (mut config, load_error) = match ReceiverConfig::load(&config_dir) {
        Ok(config) => (config, None),
        Err(e) => (ReceiverConfig::default(), Some(e)),
    };
    config.apply_env_overrides()?;

    let log_dir = config.logging.file.then(paths::log_dir);
    LoggerInitialize(config.logging.level_filter(), log_dir.as_deref())?;

    info!("Joystick receiver starting");
    if let Some(path) = dotenv_path {
        info!("Environment loaded from {}", path.display());
    }
    info!("Config directory: {}", config_dir.display());
    if let Some(e) = load_error {
        warn!("Config not usable, running with defaults: {}", e);
    }

    let control_state = ControlState::new();
    let _actuator = spawn_actuator(&control_state, LoggingActuator::new());

    let handle = start_receiver(&config, control_state.clone()).await?;

    shutdown_signal().await?;

    info!("Shutdown requested");
    handle.shutdown();
    info!("Final controls: {}", control_state.snapshot().await);

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() -> Result<(), ReceiverAppError> {
    #[cfg(unix)]
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        .map_err(signal_error)?;

    #[cfg(unix)]
    let terminate = sigterm.recv();

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Option<()>>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map_err(signal_error),
        _ = terminate => Ok(()),
    }
}

#[track_caller]
fn signal_error(error: std::io::Error) -> ReceiverAppError {
    ReceiverAppError::Receiver {
        message: format!("Failed to install shutdown signal handler: {error}"),
        location: ErrorLocation::from(Location::caller()),
    }
}
