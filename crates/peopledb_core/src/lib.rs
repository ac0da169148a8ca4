//! Generic CRUD repository layer over SQLite.
//!
//! A concrete repository is an [`EntityMapping`]: it binds entity values,
//! decodes rows and declares SQL per [`CrudOperation`]. [`CrudRepository`]
//! runs the shared save/find/count/delete/update flow for every mapping.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{default_log_level, DatabaseLocation, LogSettings, StoreConfig};
pub use logging::{init_logging, logging_status};
pub use model::address::{Address, Region};
pub use model::person::{Person, PersonId};
pub use model::ValidationError;
pub use repo::address_repo::{AddressMapping, AddressRepository};
pub use repo::crud_repo::{CrudRepository, EntityMapping};
pub use repo::error::{ConfigError, PersistenceCause, RepoError, RepoResult};
pub use repo::identity::{identity_of, Entity, EntityId, IdentityAccessor, IdentityField};
pub use repo::people_repo::{PeopleMapping, PeopleRepository};
pub use repo::sql::{resolve_sql, CrudOperation, SqlDeclaration, IDS_TOKEN};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
