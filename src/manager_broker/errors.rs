use thiserror::Error;

/// Error depicting errors that occur while setting up the broker side of the forwarder
///
/// All variants are fatal at startup.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("ConnectionError: {0}")]
    ConnectionError(String),
    #[error("ChannelError: {0}")]
    ChannelError(String),
    #[error("QueueConfigurationError: {0}")]
    QueueConfigurationError(String),
    #[error("ConsumeError: {0}")]
    ConsumeError(String),
}
