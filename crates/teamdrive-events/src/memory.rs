//! In-memory event bus for single-node deployments and tests.

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

use teamdrive_core::events::DomainEvent;
use teamdrive_core::result::AppResult;
use teamdrive_core::traits::EventPublisher;

/// Broadcasts every published event to all subscribers and keeps a log.
#[derive(Debug)]
pub struct MemoryEventBus {
    sender: broadcast::Sender<DomainEvent>,
    log: RwLock<Vec<DomainEvent>>,
}

impl MemoryEventBus {
    /// Create a bus whose subscribers buffer up to `buffer_size` events.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            sender: broadcast::channel(buffer_size).0,
            log: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Every event published so far.
    pub async fn published(&self) -> Vec<DomainEvent> {
        self.log.read().await.clone()
    }

    /// Routing keys of every event published so far, in order.
    pub async fn routing_keys(&self) -> Vec<&'static str> {
        self.log.read().await.iter().map(|e| e.routing_key()).collect()
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for MemoryEventBus {
    async fn publish(&self, event: DomainEvent) -> AppResult<()> {
        debug!(routing_key = event.routing_key(), event_id = %event.id, "Publishing event");
        self.log.write().await.push(event.clone());
        // No subscribers is not an error.
        let _ = self.sender.send(event);
        Ok(())
    }
}
