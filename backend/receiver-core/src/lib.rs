pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod receiver;

#[cfg(test)]
mod tests;

pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
pub const DEFAULT_LISTEN_PORT: u16 = 8765;

/// Directory name used under the platform config/data directories.
pub const APP_DIR_NAME: &str = "joystick-receiver";
