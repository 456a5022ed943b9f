//! Event publisher trait.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Fire-and-forget sink for domain events.
///
/// Callers log publish failures and carry on; a failed publish never undoes
/// the storage operation that produced the event.
#[async_trait]
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish one event on the channel derived from its routing key.
    async fn publish(&self, event: DomainEvent) -> AppResult<()>;
}
