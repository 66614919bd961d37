pub mod config;
pub mod protocol;
pub mod receiver;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Receiver(#[from] receiver::ReceiverError),

    #[error(transparent)]
    Protocol(#[from] protocol::ProtocolError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
