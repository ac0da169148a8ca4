//! Error taxonomy shared by every repository built on the CRUD engine.
//!
//! # Invariants
//! - "Not found" is never an error; lookups return `None`/empty instead.
//! - Save/update failures always carry a diagnostic snapshot of the entity.

use crate::db::DbError;
use crate::model::ValidationError;
use crate::repo::sql::CrudOperation;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Mis-declared repository or entity. Fatal to the call, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The entity type registers no identity field.
    MissingIdentity { entity: &'static str },
    /// The entity type registers more than one identity field.
    AmbiguousIdentity {
        entity: &'static str,
        fields: Vec<&'static str>,
    },
    /// Neither a declaration nor an override supplies SQL for the operation.
    SqlNotDefined {
        repository: &'static str,
        operation: CrudOperation,
    },
    /// A delete-many template without the id-list token.
    MissingIdsToken { repository: &'static str },
}

impl ConfigError {
    pub fn sql_not_defined(repository: &'static str, operation: CrudOperation) -> Self {
        Self::SqlNotDefined {
            repository,
            operation,
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingIdentity { entity } => {
                write!(f, "no identity field registered for `{entity}`")
            }
            Self::AmbiguousIdentity { entity, fields } => write!(
                f,
                "`{entity}` registers {} identity fields ({}); exactly one is required",
                fields.len(),
                fields.join(", ")
            ),
            Self::SqlNotDefined {
                repository,
                operation,
            } => write!(f, "SQL not defined for `{operation}` in `{repository}`"),
            Self::MissingIdsToken { repository } => write!(
                f,
                "delete-many SQL for `{repository}` has no `{}` token",
                crate::repo::sql::IDS_TOKEN
            ),
        }
    }
}

impl Error for ConfigError {}

/// Why a save or update was rejected.
#[derive(Debug)]
pub enum PersistenceCause {
    Db(DbError),
    /// The insert ran but the store reported no new row.
    NoGeneratedKey,
    /// Saving again would replace an identity the entity already carries.
    AlreadyPersisted(i64),
    /// Update of an entity that was never saved.
    MissingIdentity,
}

impl Display for PersistenceCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NoGeneratedKey => write!(f, "store generated no key"),
            Self::AlreadyPersisted(id) => write!(f, "entity already persisted with id {id}"),
            Self::MissingIdentity => write!(f, "entity has no identity yet"),
        }
    }
}

impl From<rusqlite::Error> for PersistenceCause {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    Configuration(ConfigError),
    /// Save/update rejected; `entity` is the `Debug` rendering at failure time.
    Persistence {
        entity: String,
        cause: PersistenceCause,
    },
    /// Store failure while finding, counting or deleting.
    Db(DbError),
    /// Delete of an entity that was never saved.
    MissingIdentity { entity: String },
    Validation(ValidationError),
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn persistence(entity: &impl Debug, cause: impl Into<PersistenceCause>) -> Self {
        Self::Persistence {
            entity: format!("{entity:?}"),
            cause: cause.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "repository misconfigured: {err}"),
            Self::Persistence { entity, cause } => {
                write!(f, "unable to persist {entity}: {cause}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingIdentity { entity } => write!(f, "{entity} has not been saved yet"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Persistence {
                cause: PersistenceCause::Db(err),
                ..
            } => Some(err),
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Persistence { .. } | Self::MissingIdentity { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ConfigError> for RepoError {
    fn from(value: ConfigError) -> Self {
        Self::Configuration(value)
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
