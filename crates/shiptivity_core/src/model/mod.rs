//! Domain model for swimlane clients.
//!
//! # Invariants
//! - A client belongs to exactly one `Lane`.
//! - Within a lane, priorities form the dense sequence `1..=N`.

pub mod client;
