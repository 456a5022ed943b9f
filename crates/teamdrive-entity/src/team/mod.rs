//! Team membership as reported by the team directory.

pub mod member;
pub mod role;

pub use member::TeamMember;
pub use role::MemberRole;
