//! Tree traversal over the node store.

pub mod walker;

pub use walker::{Subtree, TreeWalker, ZipEntry};
