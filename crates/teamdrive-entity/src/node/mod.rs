//! File and folder nodes.

pub mod kind;
pub mod model;
pub mod query;
pub mod update;
pub mod visibility;

pub use kind::{NodeStatus, NodeType};
pub use model::{CreateNode, Node, storage_key_for};
pub use query::{AccessScope, NodeFilter, NodeSort, ParentScope, ProjectScope};
pub use update::{NodeUpdate, UpdateOutcome};
pub use visibility::Visibility;
