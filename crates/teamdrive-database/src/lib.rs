//! # teamdrive-database
//!
//! The [`NodeStore`] contract, its PostgreSQL implementation, an in-memory
//! implementation for tests and single-process deployments, and the
//! connection pool and migration runner.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNodeStore;
pub use repositories::PgNodeStore;
pub use store::NodeStore;
