use thiserror::Error;

/// Error depicting errors that occur while setting up the storage API client
///
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("InvalidUrl: {0}")]
    InvalidUrl(String),
    #[error("ClientError: {0}")]
    ClientError(#[from] reqwest::Error),
}

/// Error depicting a failed attempt to hand a weather record over to the storage API
///
/// All variants are considered transient, the message is requeued.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("EncodeError: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("NetworkError: {0}")]
    Network(#[from] reqwest::Error),
    #[error("StatusError: API returned status {0}")]
    Status(u16),
}
