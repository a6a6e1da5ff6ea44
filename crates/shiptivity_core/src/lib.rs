//! Core domain logic for Shiptivity swimlanes.
//! This crate is the single source of truth for lane ranking invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{Client, ClientId, Lane, LaneParseError, NewClient};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};
pub use service::client_service::{ClientService, ClientServiceError, LaneViolation};
pub use service::reorder::{reposition, resolve_placement, Placement};
pub use service::validation::{validate_id, validate_lane, InvalidId, InvalidIdReason, InvalidLane};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
