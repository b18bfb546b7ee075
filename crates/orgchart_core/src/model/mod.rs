//! Domain model for organizations, contacts and projects.
//!
//! # Responsibility
//! - Define canonical records shared by storage, chart and export layers.
//! - Keep field validation next to the data it guards.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned at creation.
//! - `Contact::parent_id` is a plain reference; resolving it is the
//!   hierarchy builder's job, not the model's.

pub mod contact;
pub mod organization;
pub mod project;
