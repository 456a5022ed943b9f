//! # teamdrive-entity
//!
//! Domain entity models for TeamDrive. The node table is the only persisted
//! entity; team membership is a value object returned by the team
//! directory. Database entities derive `sqlx::FromRow`.

pub mod node;
pub mod team;

pub use node::{
    AccessScope, CreateNode, Node, NodeFilter, NodeSort, NodeStatus, NodeType, NodeUpdate,
    ParentScope, ProjectScope, UpdateOutcome, Visibility,
};
pub use team::{MemberRole, TeamMember};
