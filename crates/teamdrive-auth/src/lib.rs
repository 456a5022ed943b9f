//! # teamdrive-auth
//!
//! Authorization for the storage tree. Authentication happens upstream;
//! this crate only decides what an already-identified actor may touch.
//!
//! ## Modules
//!
//! - `team` — team directory lookups (HTTP client and in-memory fake)
//! - `acl` — request scope, visibility rules and the permission resolver

pub mod acl;
pub mod team;

pub use acl::{AccessSource, PermissionResolver, RequestScope, ResolvedNode};
pub use team::{HttpTeamDirectory, MemoryTeamDirectory, TeamDirectory};
