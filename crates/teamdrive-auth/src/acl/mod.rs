//! Access control: request scope, visibility and permission resolution.

pub mod resolver;
pub mod scope;
pub mod visibility;

pub use resolver::{AccessSource, PermissionResolver, ResolvedNode};
pub use scope::RequestScope;
pub use visibility::can_see;
