use log::info;
use thiserror::Error;
use crate::config::{load_config, redacted_url, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_api::{ApiError, WeatherApi};
use crate::manager_broker::{Broker, BrokerError};

pub struct Mgr {
    pub broker: Broker,
    pub api: WeatherApi,
}

/// Initializes and returns configuration and a Mgr struct holding the broker and API managers
///
/// The queue is declared and the prefetch limit applied before returning, so any
/// broker-side misconfiguration fails here rather than in the consume loop.
pub async fn init() -> Result<(Config, Mgr), InitializationError> {
    // Load configuration
    let config = load_config()?;

    // Setup logging
    let _ = setup_logger(config.log_path.as_deref(), config.log_level)?;

    // Print version
    info!("starting weather forwarder version: {}", env!("CARGO_PKG_VERSION"));

    let api = WeatherApi::new(&config)?;
    info!("forwarding weather records to {}", api.url());

    info!("connecting to broker at {}", redacted_url(&config.rabbitmq_url));
    let broker = Broker::connect(&config.rabbitmq_url).await?;
    broker.declare_queue(&config.queue_name).await?;
    broker.set_prefetch(config.prefetch_count).await?;

    let mgr = Mgr {
        broker,
        api,
    };

    Ok((config, mgr))
}

/// Error depicting errors that occur while initializing the forwarder
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("ApiSetupError: {0}")]
    ApiSetupError(#[from] ApiError),
    #[error("BrokerError: {0}")]
    BrokerError(#[from] BrokerError),
}
