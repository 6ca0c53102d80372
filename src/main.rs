use anyhow::Result;
use log::{error, info};
use tokio_util::sync::CancellationToken;
use crate::errors::ForwarderError;
use crate::initialization::init;
use crate::worker::run;

mod config;
mod errors;
mod initialization;
mod logging;
mod manager_api;
mod manager_broker;
mod models;
mod worker;

#[tokio::main]
async fn main() -> Result<()> {
    // If initialization fails, logging may not even be set up, so the error goes out
    // through the process exit status.
    let (config, mgr) = match init().await {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(ForwarderError(format!("Initialization failed: {}", e)))?;
        }
    };

    let consumer = match mgr.broker.consume(&config.queue_name, &config.consumer_tag).await {
        Ok(consumer) => consumer,
        Err(e) => {
            mgr.broker.close().await;
            return Err(ForwarderError(format!("Failed to register a consumer: {}", e)))?;
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_signal(cancel.clone()));

    info!("Forwarder started. Waiting for messages...");
    let result = run(consumer, &mgr.api, cancel).await;

    mgr.broker.close().await;

    match result {
        Ok(_) => {
            info!("Forwarder stopped");
        },
        Err(e) => {
            error!("Consume loop failed: {}", e);
            return Err(ForwarderError(format!("Consume loop failed: {}", e)))?;
        }
    }

    Ok(())
}

/// Cancels the token on Ctrl-C or, on unix, SIGTERM
///
/// # Arguments
///
/// * 'cancel' - token shared with the consume loop
async fn cancel_on_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
    cancel.cancel();
}
