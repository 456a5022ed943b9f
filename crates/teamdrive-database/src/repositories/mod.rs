//! Concrete PostgreSQL repositories.

pub mod node;

pub use node::PgNodeStore;
