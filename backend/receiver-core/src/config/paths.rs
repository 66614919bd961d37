//! Platform locations for the receiver's config and log files.
//!
//! # Platform Behavior
//! - **Linux**: `$XDG_CONFIG_HOME/joystick-receiver`, logs in `~/.local/share/joystick-receiver/logs`
//! - **macOS**: `~/Library/Application Support/joystick-receiver`
//! - **Windows**: `%APPDATA%/joystick-receiver`

use crate::APP_DIR_NAME;

use std::env;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub const ENV_CONFIG_DIR: &str = "RECEIVER_CONFIG_DIR";

const LOG_DIR_NAME: &str = "logs";

/// Resolves the directory holding `config.json`.
///
/// `RECEIVER_CONFIG_DIR` wins, then the platform config dir, then the working directory.
pub fn config_dir() -> PathBuf {
    if let Ok(custom_dir) = env::var(ENV_CONFIG_DIR) {
        let dir = PathBuf::from(custom_dir);
        info!("Using {ENV_CONFIG_DIR} override: {:?}", dir);
        return dir;
    }

    if let Some(base) = dirs::config_dir() {
        let dir = base.join(APP_DIR_NAME);
        debug!("Platform config dir: {:?}", dir);
        return dir;
    }

    warn!("No platform config directory, using working directory");
    PathBuf::from(".")
}

/// Resolves the directory for the optional log file.
pub fn log_dir() -> PathBuf {
    match dirs::data_local_dir() {
        Some(base) => base.join(APP_DIR_NAME).join(LOG_DIR_NAME),
        None => PathBuf::from(LOG_DIR_NAME),
    }
}

/// Loads `.env` from the working directory, then from next to the executable.
///
/// Returns the file that was loaded, if any. Values already in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    if let Ok(path) = dotenvy::dotenv() {
        info!("Loaded .env from: {:?}", path);
        return Some(path);
    }

    let exe_path = env::current_exe().ok()?;
    let env_path = exe_path.parent().map(|dir| dir.join(".env"))?;
    load_dotenv_from(&env_path)
}

fn load_dotenv_from(env_path: &Path) -> Option<PathBuf> {
    if !env_path.exists() {
        return None;
    }

    match dotenvy::from_path(env_path) {
        Ok(()) => {
            info!("Loaded .env from: {:?}", env_path);
            Some(env_path.to_path_buf())
        }
        Err(e) => {
            warn!("Failed to parse .env at {:?}: {}", env_path, e);
            None
        }
    }
}
