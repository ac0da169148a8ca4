//! Domain records persisted by the repository layer.
//!
//! # Invariants
//! - Identity is unset until the first save and never reassigned afterwards.
//! - Entities carry no persistence logic; repositories own the mapping.

pub mod address;
pub mod person;
mod validation;

pub use validation::ValidationError;
