use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use crate::config::Config;
use crate::domain::auth::errors::MailError;
use crate::domain::auth::models::MailMessage;
use crate::domain::auth::ports::MailDispatcher;
use crate::outbound::mail::messages::MailRequestMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for MailError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => MailError::SerializationFailed(msg),
            KafkaProducerError::SendError(msg) => MailError::DeliveryFailed(msg),
        }
    }
}

/// Mail dispatcher publishing mail requests to a Kafka topic.
///
/// A downstream mail service renders the template and owns the SMTP transport.
pub struct KafkaMailDispatcher {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaMailDispatcher {
    /// Create a new Kafka mail dispatcher with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.kafka.brokers,
            topic = %config.kafka.mail_topic,
            "Initializing Kafka producer for mail requests"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", "30000")
            .set("compression.type", "gzip")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "10")
            .set("max.in.flight.requests.per.connection", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.kafka.mail_topic.to_string(),
            timeout: Duration::from_secs(30),
        })
    }

    async fn publish(&self, message: &MailRequestMessage) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        // Keyed by recipient so requests for one mailbox stay ordered
        let record = FutureRecord::to(&self.topic)
            .key(&message.recipient)
            .payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(
                    topic = %self.topic,
                    message_id = %message.message_id,
                    "Mail request published"
                );
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl MailDispatcher for KafkaMailDispatcher {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let request = MailRequestMessage::from(message);

        self.publish(&request).await.map_err(|e| {
            tracing::error!(
                message_id = %request.message_id,
                template = %request.template,
                error = %e,
                "Failed to publish mail request"
            );
            e.into()
        })
    }
}
