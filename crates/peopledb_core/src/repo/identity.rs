//! Identity registration and access for persisted entities.
//!
//! # Responsibility
//! - Let each entity type register its primary-key field as a typed get/set pair.
//! - Give the CRUD engine the only sanctioned way to write that field.
//!
//! # Invariants
//! - Exactly one identity field per entity type; anything else is a
//!   configuration error reported on first use.
//! - The registered setter is callable from this crate only.

use crate::repo::error::ConfigError;
use std::any::type_name;
use std::fmt::{self, Debug, Formatter};

/// Store-assigned primary key shared by every entity.
pub type EntityId = i64;

/// A domain record the CRUD engine can persist.
pub trait Entity: Debug + Sized + 'static {
    /// Identity registrations for this type. Exactly one entry is expected.
    const IDENTITY_FIELDS: &'static [IdentityField<Self>];
}

/// Typed accessor pair for the field holding an entity's identity.
pub struct IdentityField<T> {
    name: &'static str,
    get: fn(&T) -> Option<EntityId>,
    set: fn(&mut T, EntityId),
}

impl<T> IdentityField<T> {
    pub const fn new(
        name: &'static str,
        get: fn(&T) -> Option<EntityId>,
        set: fn(&mut T, EntityId),
    ) -> Self {
        Self { name, get, set }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Debug for IdentityField<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityField")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Resolved identity field of one entity type.
pub struct IdentityAccessor<T: 'static> {
    field: &'static IdentityField<T>,
}

impl<T: Entity> IdentityAccessor<T> {
    /// Looks up the single identity registration of `T`.
    pub fn resolve() -> Result<Self, ConfigError> {
        match T::IDENTITY_FIELDS {
            [field] => Ok(Self { field }),
            [] => Err(ConfigError::MissingIdentity {
                entity: type_name::<T>(),
            }),
            fields => Err(ConfigError::AmbiguousIdentity {
                entity: type_name::<T>(),
                fields: fields.iter().map(IdentityField::name).collect(),
            }),
        }
    }

    pub fn field_name(&self) -> &'static str {
        self.field.name
    }

    pub fn get(&self, entity: &T) -> Option<EntityId> {
        (self.field.get)(entity)
    }

    pub(crate) fn set(&self, entity: &mut T, id: EntityId) {
        (self.field.set)(entity, id)
    }
}

impl<T: 'static> Debug for IdentityAccessor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdentityAccessor")
            .field(&self.field.name)
            .finish()
    }
}

/// Reads the identity of any registered entity.
pub fn identity_of<T: Entity>(entity: &T) -> Result<Option<EntityId>, ConfigError> {
    Ok(IdentityAccessor::<T>::resolve()?.get(entity))
}

#[cfg(test)]
mod tests {
    use super::{identity_of, Entity, EntityId, IdentityAccessor, IdentityField};
    use crate::repo::error::ConfigError;

    #[derive(Debug, Default)]
    struct Ticket {
        key: Option<EntityId>,
    }

    impl Ticket {
        fn key(&self) -> Option<EntityId> {
            self.key
        }

        fn assign_key(&mut self, key: EntityId) {
            self.key = Some(key);
        }
    }

    impl Entity for Ticket {
        const IDENTITY_FIELDS: &'static [IdentityField<Self>] =
            &[IdentityField::new("key", Ticket::key, Ticket::assign_key)];
    }

    #[derive(Debug)]
    struct Anonymous;

    impl Entity for Anonymous {
        const IDENTITY_FIELDS: &'static [IdentityField<Self>] = &[];
    }

    #[derive(Debug)]
    struct TwoKeys;

    fn no_key(_: &TwoKeys) -> Option<EntityId> {
        None
    }

    fn ignore_key(_: &mut TwoKeys, _: EntityId) {}

    impl Entity for TwoKeys {
        const IDENTITY_FIELDS: &'static [IdentityField<Self>] = &[
            IdentityField::new("left", no_key, ignore_key),
            IdentityField::new("right", no_key, ignore_key),
        ];
    }

    #[test]
    fn accessor_reads_and_writes_registered_field() {
        let accessor = IdentityAccessor::<Ticket>::resolve().unwrap();
        let mut ticket = Ticket::default();
        assert_eq!(accessor.get(&ticket), None);

        accessor.set(&mut ticket, 42);
        assert_eq!(ticket.key, Some(42));
        assert_eq!(identity_of(&ticket).unwrap(), Some(42));
        assert_eq!(accessor.field_name(), "key");
    }

    #[test]
    fn missing_registration_is_configuration_error() {
        let err = IdentityAccessor::<Anonymous>::resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity { entity } if entity.ends_with("Anonymous")));
    }

    #[test]
    fn duplicate_registration_is_configuration_error() {
        let err = identity_of(&TwoKeys).unwrap_err();
        match err {
            ConfigError::AmbiguousIdentity { fields, .. } => {
                assert_eq!(fields, vec!["left", "right"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
