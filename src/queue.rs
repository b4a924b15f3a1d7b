//! The status queue collaborator: messages handed to the downstream
//! processing pipeline, the queue abstraction, and its Redis implementation.
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::queue as constants;
use errors::QueueError;

/// The message sent when a submission should trigger a cross-match attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// The reporter's identity, or the `unregistered` sentinel.
    pub reporter_id: String,
    /// The subject identifier the report was persisted under.
    pub subject_id: Uuid,
    /// The subject's name.
    pub subject_name: String,
    /// Public URL of the subject's photo.
    pub image_url: String,
    /// The downstream purpose tag, always `process_subject_status`.
    pub purpose: String,
}

/// The queue as the ingestion flows see it. Injected as a trait object so
/// tests can swap in an in-memory fake.
#[async_trait]
pub trait StatusQueue: Send + Sync {
    /// Deliver a message to the queue and return its receipt identifier.
    async fn send(&self, message: &StatusMessage) -> Result<String, QueueError>;
}

/// A `StatusQueue` delivering messages onto a Redis list.
#[derive(Clone)]
pub struct RedisStatusQueue {
    /// A multiplexed connection, safe to clone and share between threads.
    conn: MultiplexedConnection,
    /// The list messages are pushed onto.
    queue: String,
}

impl RedisStatusQueue {
    /// Initiate a connection to the configured status queue.
    pub async fn connect() -> Result<Self, QueueError> {
        let client = redis::Client::open(constants::REDIS_URL.clone())
            .map_err(|err| QueueError::Unavailable(err.to_string()))?;
        Ok(Self {
            conn: client.get_multiplexed_async_connection().await?,
            queue: constants::QUEUE_NAME.clone(),
        })
    }
}

#[async_trait]
impl StatusQueue for RedisStatusQueue {
    async fn send(&self, message: &StatusMessage) -> Result<String, QueueError> {
        let payload = serde_json::to_string(message)
            .map_err(|err| QueueError::Serialization(err.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn.rpush(&self.queue, payload).await?;
        // Redis has no native receipt id, so one is minted per delivery.
        Ok(Uuid::new_v4().to_string())
    }
}

pub mod errors {
    use thiserror::Error;

    /// Errors raised by the status queue.
    #[derive(Error, Debug)]
    pub enum QueueError {
        /// An error returned by Redis.
        #[error(transparent)]
        Redis(#[from] redis::RedisError),
        /// The message could not be serialized for delivery.
        #[error("status message serialization failed: {0}")]
        Serialization(String),
        /// The queue could not be reached at all.
        #[error("status queue unavailable: {0}")]
        Unavailable(String),
    }
}
