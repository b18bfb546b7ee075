//! Core domain logic for the industrial org chart.
//! This crate owns the reporting-hierarchy rules; front ends only render.

pub mod db;
pub mod enrich;
pub mod hierarchy;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use hierarchy::{build_forest, DetachReason, Detachment, Forest, ForestNode, HierarchyNode};
pub use layout::{
    layout_forest, ChartEdge, ChartLayout, HandleSide, LayoutConfig, LayoutError, NodePosition,
    Orientation, Point,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, ContactValidationError};
pub use model::organization::{Organization, OrganizationId, OrganizationValidationError};
pub use model::project::{Project, ProjectAssignment, ProjectId};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::organization_repo::{OrganizationRepository, SqliteOrganizationRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::chart_service::{ChartService, OrgChart};
pub use service::contact_service::ContactService;
pub use service::organization_service::OrganizationService;
pub use service::project_service::ProjectService;
pub use service::{ServiceError, ServiceResult};
pub use transfer::brief::AccountBrief;
pub use transfer::{TransferError, TransferResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
