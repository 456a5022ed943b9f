//! Fire-and-forget event emission.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use teamdrive_core::events::{DomainEvent, StorageEvent};
use teamdrive_core::traits::EventPublisher;

/// Wraps an [`EventPublisher`] so publish failures are logged and never
/// bubble up into the storage operation.
#[derive(Debug, Clone)]
pub struct EventEmitter {
    publisher: Arc<dyn EventPublisher>,
}

impl EventEmitter {
    /// Creates a new emitter.
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self { publisher }
    }

    /// Publish a storage event attributed to `actor_id`.
    pub async fn emit(&self, actor_id: Uuid, event: StorageEvent) {
        let event = DomainEvent::storage(actor_id, event);
        let routing_key = event.routing_key();
        if let Err(e) = self.publisher.publish(event).await {
            warn!(routing_key, actor_id = %actor_id, error = %e, "Failed to publish event");
        }
    }
}
