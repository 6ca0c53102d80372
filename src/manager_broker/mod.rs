mod errors;

use async_trait::async_trait;
use lapin::message::Delivery;
use lapin::options::{BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties, Consumer};
use log::{info, warn};
use crate::worker::{AckError, InboundMessage};

pub use errors::BrokerError;

/// Struct owning the broker connection and the channel opened on it
///
/// Both are released when the struct is closed or dropped.
pub struct Broker {
    connection: Connection,
    channel: Channel,
}

impl Broker {
    /// Connects to the broker and opens a channel
    ///
    /// # Arguments
    ///
    /// * 'url' - AMQP connection string
    pub async fn connect(url: &str) -> Result<Broker, BrokerError> {
        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .map_err(|e| BrokerError::ConnectionError(e.to_string()))?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| BrokerError::ChannelError(e.to_string()))?;

        Ok(Broker { connection, channel })
    }

    /// Declares a durable, non-exclusive, non auto-deleted queue
    ///
    /// Declaring an existing queue with the same parameters succeeds, a queue with the same
    /// name but other parameters makes the broker refuse the declaration.
    ///
    /// # Arguments
    ///
    /// * 'name' - name of the queue
    pub async fn declare_queue(&self, name: &str) -> Result<(), BrokerError> {
        let queue = self.channel
            .queue_declare(name, queue_declare_options(), FieldTable::default())
            .await
            .map_err(|e| BrokerError::QueueConfigurationError(format!("queue '{}': {}", name, e)))?;

        info!("Declared queue {} ({} messages waiting, {} consumers)",
            queue.name().as_str(), queue.message_count(), queue.consumer_count());

        Ok(())
    }

    /// Limits the number of unacknowledged deliveries the broker pushes to this channel
    ///
    /// # Arguments
    ///
    /// * 'prefetch_count' - maximum unacknowledged deliveries, 0 leaves the broker default
    pub async fn set_prefetch(&self, prefetch_count: u16) -> Result<(), BrokerError> {
        if prefetch_count == 0 {
            return Ok(());
        }

        self.channel
            .basic_qos(prefetch_count, BasicQosOptions::default())
            .await
            .map_err(|e| BrokerError::ChannelError(format!("basic.qos: {}", e)))
    }

    /// Registers a consumer with manual acknowledgement on the queue
    ///
    /// # Arguments
    ///
    /// * 'queue' - name of a declared queue
    /// * 'consumer_tag' - consumer tag, empty lets the broker generate one
    pub async fn consume(&self, queue: &str, consumer_tag: &str) -> Result<Consumer, BrokerError> {
        let consumer = self.channel
            .basic_consume(queue, consumer_tag, consume_options(), FieldTable::default())
            .await
            .map_err(|e| BrokerError::ConsumeError(e.to_string()))?;

        info!("Registered consumer {} on queue {}", consumer.tag().as_str(), queue);

        Ok(consumer)
    }

    /// Closes the channel and then the connection
    ///
    /// Deliveries that were not settled yet are returned to the queue by the broker.
    pub async fn close(self) {
        if let Err(e) = self.channel.close(200, "forwarder shutting down").await {
            warn!("Failed to close channel: {}", e);
        }
        if let Err(e) = self.connection.close(200, "forwarder shutting down").await {
            warn!("Failed to close connection: {}", e);
        }
    }
}

#[async_trait]
impl InboundMessage for Delivery {
    fn body(&self) -> &[u8] {
        &self.data
    }

    fn delivery_tag(&self) -> u64 {
        self.delivery_tag
    }

    fn redelivered(&self) -> bool {
        self.redelivered
    }

    async fn ack(&self) -> Result<(), AckError> {
        self.acker
            .ack(BasicAckOptions::default())
            .await
            .map_err(|e| AckError(e.to_string()))
    }

    async fn nack(&self, requeue: bool) -> Result<(), AckError> {
        self.acker
            .nack(BasicNackOptions { multiple: false, requeue })
            .await
            .map_err(|e| AckError(e.to_string()))
    }
}

fn queue_declare_options() -> QueueDeclareOptions {
    QueueDeclareOptions {
        passive: false,
        durable: true,
        exclusive: false,
        auto_delete: false,
        nowait: false,
    }
}

fn consume_options() -> BasicConsumeOptions {
    BasicConsumeOptions {
        no_local: false,
        no_ack: false,
        exclusive: false,
        nowait: false,
    }
}
