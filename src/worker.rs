use std::fmt::Display;
use std::pin::pin;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use log::{error, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use crate::manager_api::ForwardError;
use crate::models::WeatherRecord;

/// A message delivered by the broker that must be settled exactly once
///
#[async_trait]
pub trait InboundMessage: Send + Sync {
    fn body(&self) -> &[u8];

    fn delivery_tag(&self) -> u64;

    /// True if the broker has delivered this message before
    fn redelivered(&self) -> bool;

    /// Removes the message from the queue
    async fn ack(&self) -> Result<(), AckError>;

    /// Rejects the message, either returning it to the queue or discarding it
    ///
    /// # Arguments
    ///
    /// * 'requeue' - whether the broker should redeliver the message
    async fn nack(&self, requeue: bool) -> Result<(), AckError>;
}

/// Destination that decoded weather records are handed over to
///
#[async_trait]
pub trait Forward: Send + Sync {
    async fn forward(&self, record: &WeatherRecord) -> Result<(), ForwardError>;
}

/// Acknowledgement decision taken for one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Stored by the API, acked
    Acked,
    /// Undecodable, nacked without requeue
    Discarded,
    /// Forwarding failed, nacked with requeue
    Requeued,
}

/// Consumes deliveries until cancelled, processing them one at a time in delivery order
///
/// Returns Ok only on cancellation. A failing or ending delivery stream means the broker
/// consumer is gone and is reported as an error.
///
/// # Arguments
///
/// * 'deliveries' - stream of deliveries from the broker consumer
/// * 'forwarder' - where decoded records are handed over to
/// * 'cancel' - token that stops the loop between two deliveries
pub async fn run<S, M, E, F>(deliveries: S, forwarder: &F, cancel: CancellationToken) -> Result<(), WorkerError>
where
    S: Stream<Item = Result<M, E>>,
    M: InboundMessage,
    E: Display,
    F: Forward + ?Sized,
{
    let mut deliveries = pin!(deliveries);

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Cancellation requested, stopping consumer");
                return Ok(());
            }
            next = deliveries.next() => next,
        };

        match next {
            Some(Ok(message)) => {
                process_delivery(&message, forwarder).await;
            },
            Some(Err(e)) => return Err(WorkerError::Delivery(e.to_string())),
            None => return Err(WorkerError::StreamClosed),
        }
    }
}

/// Decodes, forwards and settles one delivery
///
/// Errors never leave this function, they end up as the acknowledgement decision.
///
/// # Arguments
///
/// * 'message' - the delivery to process
/// * 'forwarder' - where the decoded record is handed over to
pub async fn process_delivery<M, F>(message: &M, forwarder: &F) -> Outcome
where
    M: InboundMessage + ?Sized,
    F: Forward + ?Sized,
{
    info!("Received message {} (redelivered: {}): {}",
        message.delivery_tag(), message.redelivered(), String::from_utf8_lossy(message.body()));

    let outcome = match WeatherRecord::from_slice(message.body()) {
        Err(e) => {
            warn!("Discarding message {}: {}", message.delivery_tag(), e);
            Outcome::Discarded
        },
        Ok(record) => match forwarder.forward(&record).await {
            Ok(()) => {
                info!("Successfully processed weather data for {}", record.city);
                Outcome::Acked
            },
            Err(e) => {
                warn!("Requeueing message {}: {}", message.delivery_tag(), e);
                Outcome::Requeued
            },
        },
    };

    settle(message, outcome).await;

    outcome
}

/// Sends the acknowledgement matching the outcome, a failure is only logged
///
/// # Arguments
///
/// * 'message' - the delivery to settle
/// * 'outcome' - the decision taken for it
async fn settle<M: InboundMessage + ?Sized>(message: &M, outcome: Outcome) {
    let result = match outcome {
        Outcome::Acked => message.ack().await,
        Outcome::Discarded => message.nack(false).await,
        Outcome::Requeued => message.nack(true).await,
    };

    if let Err(e) = result {
        error!("Failed to settle message {} as {:?}: {}", message.delivery_tag(), outcome, e);
    }
}

/// Error depicting a failed acknowledgement towards the broker
///
#[derive(Debug, Error)]
#[error("AckError: {0}")]
pub struct AckError(pub String);

/// Error depicting the end of the consume loop without cancellation
///
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("DeliveryError: {0}")]
    Delivery(String),
    #[error("StreamClosedError: consumer was closed by the broker")]
    StreamClosed,
}
