//! Postal address domain model.
//!
//! # Invariants
//! - Same identity rules as `Person`: unset until saved, no public setter.
//! - `region` persists as its upper-case name.

use crate::model::validation::{require_text, ValidationError};
use crate::repo::identity::{Entity, EntityId, IdentityField};
use serde::{Deserialize, Serialize};

/// Coarse geographic region of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    North,
    South,
    East,
    West,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::East => "EAST",
            Self::West => "WEST",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "NORTH" => Some(Self::North),
            "SOUTH" => Some(Self::South),
            "EAST" => Some(Self::East),
            "WEST" => Some(Self::West),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    id: Option<EntityId>,
    pub street_address: String,
    /// Apartment, suite, floor.
    pub address2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub county: String,
    pub region: Region,
    pub country: String,
}

impl Address {
    pub fn new(
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postcode: impl Into<String>,
        county: impl Into<String>,
        region: Region,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street_address: street_address.into(),
            address2: None,
            city: city.into(),
            state: state.into(),
            postcode: postcode.into(),
            county: county.into(),
            region,
            country: country.into(),
        }
    }

    pub fn with_address2(mut self, address2: impl Into<String>) -> Self {
        self.address2 = Some(address2.into());
        self
    }

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("street_address", &self.street_address)?;
        require_text("city", &self.city)?;
        require_text("postcode", &self.postcode)?;
        require_text("country", &self.country)
    }

    pub(crate) fn rehydrate(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}

impl Entity for Address {
    const IDENTITY_FIELDS: &'static [IdentityField<Self>] =
        &[IdentityField::new("id", Address::id, Address::assign_id)];
}
