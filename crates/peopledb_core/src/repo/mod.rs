//! Repository layer: one generic CRUD engine plus per-table mappings.
//!
//! # Responsibility
//! - Resolve the SQL for each CRUD operation of a repository.
//! - Read and assign entity identities without widening entity APIs.
//! - Keep SQLite details out of the domain model.
//!
//! # Invariants
//! - Write paths validate entities before SQL mutations.
//! - Lookups that match nothing return `None`/empty, not `NotFound` errors.

pub mod address_repo;
pub mod crud_repo;
pub mod error;
pub mod identity;
pub mod people_repo;
pub mod sql;
