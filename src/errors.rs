use thiserror::Error;

/// Error depicting a failure that stops the forwarder process
///
#[derive(Debug, Error)]
#[error("error while running forwarder: {0}")]
pub struct ForwarderError(pub String);

/// Error depicting a message body that can't be decoded into a weather record
///
#[derive(Debug, Error)]
#[error("DecodeError: {0}")]
pub struct DecodeError(#[from] pub serde_json::Error);
