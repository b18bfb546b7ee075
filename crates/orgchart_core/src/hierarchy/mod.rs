//! Reporting hierarchy construction.
//!
//! # Responsibility
//! - Turn one organization's flat contact list into a forest of trees.
//! - Provide a nested, serializable view for export.
//!
//! # Invariants
//! - Building is pure and total: no I/O, no failure, no dropped contacts.
//! - The output never contains a cycle, whatever the stored `parent_id`s.

pub mod builder;
pub mod scope;
pub mod tree;

pub use builder::{build_forest, DetachReason, Detachment, Forest, ForestNode, NodeIndex};
pub use scope::with_management_chain;
pub use tree::HierarchyNode;
