//! Shared types and models for the BargainWale trading operations backend
//!
//! This crate contains the domain model, common wire types, and validation
//! helpers shared across the backend. Everything here is pure data and pure
//! functions; persistence and HTTP live in the backend crate.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
