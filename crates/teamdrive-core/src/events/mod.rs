//! Domain events emitted by storage operations.
//!
//! Outbound events are handed to an [`EventPublisher`](crate::traits::EventPublisher)
//! and consumed by the realtime socket gateway and the document ingestion
//! pipeline. Inbound status changes arrive from those same pipelines.

pub mod status;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use status::StatusChangedEvent;
pub use storage::StorageEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event.
    pub actor_id: Uuid,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all outbound domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A storage-related event.
    Storage(StorageEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Uuid, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Wrap a storage event.
    pub fn storage(actor_id: Uuid, event: StorageEvent) -> Self {
        Self::new(actor_id, EventPayload::Storage(event))
    }

    /// Routing key used to pick the outbound channel.
    pub fn routing_key(&self) -> &'static str {
        match &self.payload {
            EventPayload::Storage(event) => event.routing_key(),
        }
    }
}
