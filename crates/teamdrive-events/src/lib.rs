//! # teamdrive-events
//!
//! Transport for storage events. Outbound events go through an
//! [`EventPublisher`](teamdrive_core::traits::EventPublisher): an in-process
//! broadcast bus or Redis `PUBLISH`. Inbound status changes arrive on a
//! Redis channel and are handed to a [`StatusChangeHandler`].

pub mod handler;
pub mod memory;
#[cfg(feature = "redis-pubsub")]
pub mod pubsub;

pub use handler::StatusChangeHandler;
pub use memory::MemoryEventBus;
#[cfg(feature = "redis-pubsub")]
pub use pubsub::{RedisEventPublisher, RedisStatusListener};
