//! Core use-case services.
//!
//! # Responsibility
//! - Validate caller input before any mutation is attempted.
//! - Recompute lane rankings when a client changes lane or rank.
//! - Keep callers decoupled from storage details.

pub mod client_service;
pub mod reorder;
pub mod validation;
