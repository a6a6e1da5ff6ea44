//! Record store contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract the reordering engine relies on.
//! - Keep SQLite query details out of service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Repositories never decide placement; they apply what they are told.

pub mod client_repo;
