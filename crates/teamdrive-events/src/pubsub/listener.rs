//! Redis subscriber for inbound status changes.

use std::sync::Arc;

use futures::StreamExt;
use redis::Client;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use teamdrive_core::error::{AppError, ErrorKind};
use teamdrive_core::events::StatusChangedEvent;
use teamdrive_core::result::AppResult;

use super::mask_redis_url;
use crate::handler::StatusChangeHandler;

/// Subscribes to the status channel and forwards each message to a handler.
pub struct RedisStatusListener {
    client: Client,
    channel: String,
    handler: Arc<dyn StatusChangeHandler>,
}

impl std::fmt::Debug for RedisStatusListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStatusListener")
            .field("channel", &self.channel)
            .finish()
    }
}

impl RedisStatusListener {
    /// Create a listener. Nothing connects until [`run`](Self::run).
    pub fn new(url: &str, channel: String, handler: Arc<dyn StatusChangeHandler>) -> AppResult<Self> {
        info!(url = %mask_redis_url(url), channel = %channel, "Configuring status listener");
        let client = Client::open(url).map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Invalid Redis URL", e)
        })?;
        Ok(Self {
            client,
            channel,
            handler,
        })
    }

    /// Consume messages until `cancel` fires or the connection drops.
    ///
    /// Malformed payloads and handler failures are logged and skipped.
    pub async fn run(self, cancel: CancellationToken) -> AppResult<()> {
        let mut pubsub = self.client.get_async_pubsub().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to open Redis pub/sub", e)
        })?;
        pubsub.subscribe(&self.channel).await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to subscribe", e)
        })?;
        info!(channel = %self.channel, "Status listener subscribed");

        let mut messages = pubsub.on_message();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Status listener stopping");
                    return Ok(());
                }
                next = messages.next() => {
                    let Some(msg) = next else {
                        warn!(channel = %self.channel, "Status channel closed");
                        return Ok(());
                    };
                    let payload: String = match msg.get_payload() {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(error = %e, "Non-string status payload");
                            continue;
                        }
                    };
                    let event: StatusChangedEvent = match serde_json::from_str(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!(error = %e, payload = %payload, "Malformed status change");
                            continue;
                        }
                    };
                    if let Err(e) = self.handler.handle_status_changed(event).await {
                        error!(error = %e, "Failed to apply status change");
                    }
                }
            }
        }
    }
}
