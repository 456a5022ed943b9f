//! Redis `PUBLISH` event publisher.

use async_trait::async_trait;
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use teamdrive_core::error::{AppError, ErrorKind};
use teamdrive_core::events::DomainEvent;
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::EventPublisher;

use super::mask_redis_url;

/// Publishes each event as JSON on `{channel_prefix}{routing_key}`.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: ConnectionManager,
    channel_prefix: String,
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("channel_prefix", &self.channel_prefix)
            .finish()
    }
}

impl RedisEventPublisher {
    /// Connect to Redis.
    pub async fn connect(url: &str, channel_prefix: &str) -> AppResult<Self> {
        info!(url = %mask_redis_url(url), "Connecting event publisher to Redis");

        let client = Client::open(url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;
        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to connect to Redis", e)
        })?;

        Ok(Self {
            conn,
            channel_prefix: channel_prefix.to_string(),
        })
    }

    /// Full channel name for an event.
    pub fn channel_for(&self, event: &DomainEvent) -> String {
        format!("{}{}", self.channel_prefix, event.routing_key())
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: DomainEvent) -> AppResult<()> {
        let channel = self.channel_for(&event);
        let payload = serde_json::to_string(&event)?;
        let mut conn = self.conn.clone();

        let receivers = redis::cmd("PUBLISH")
            .arg(&channel)
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Redis PUBLISH failed", e)
            })?;

        debug!(channel = %channel, receivers, event_id = %event.id, "Event published");
        Ok(())
    }
}
