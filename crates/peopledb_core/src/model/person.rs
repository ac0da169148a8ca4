//! Person domain model.
//!
//! # Invariants
//! - `id` is `None` until the repository saves the person; there is no public
//!   setter for it, and deserialization never fills it.
//! - `dob` compares as an instant: two values naming the same moment in
//!   different offsets are equal. The store keeps it normalized to UTC.
//! - `salary` defaults to zero and is never negative once validated.

use crate::model::validation::{require_text, ValidationError};
use crate::repo::identity::{Entity, EntityId, IdentityField};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Primary key of a persisted person.
pub type PersonId = EntityId;

/// A person record as stored in the `people` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    #[serde(skip_deserializing)]
    id: Option<PersonId>,
    pub first_name: String,
    pub last_name: String,
    /// Date of birth; any offset is accepted, UTC is what comes back from the store.
    pub dob: DateTime<FixedOffset>,
    pub salary: Decimal,
    pub email: Option<String>,
}

impl Person {
    /// Creates an unsaved person with zero salary and no email.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        dob: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            dob,
            salary: Decimal::ZERO,
            email: None,
        }
    }

    /// Rebuilds a person that already exists in the store. Row extractors only.
    pub(crate) fn with_id(
        id: PersonId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        dob: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(first_name, last_name, dob)
        }
    }

    pub fn with_salary(mut self, salary: Decimal) -> Self {
        self.salary = salary;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn id(&self) -> Option<PersonId> {
        self.id
    }

    /// Checks the rules every write path enforces before touching SQL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        if self.salary < Decimal::ZERO {
            return Err(ValidationError::NegativeSalary(self.salary));
        }
        Ok(())
    }

    fn assign_id(&mut self, id: PersonId) {
        self.id = Some(id);
    }
}

impl Entity for Person {
    const IDENTITY_FIELDS: &'static [IdentityField<Self>] =
        &[IdentityField::new("id", Person::id, Person::assign_id)];
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id} ")?,
            None => write!(f, "#- ")?,
        }
        write!(
            f,
            "{} {} dob={} salary={}",
            self.first_name,
            self.last_name,
            self.dob.to_rfc3339(),
            self.salary
        )?;
        if let Some(email) = &self.email {
            write!(f, " email={email}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Person;
    use crate::model::ValidationError;
    use chrono::{FixedOffset, TimeZone, Utc};
    use rust_decimal::Decimal;

    fn dob(offset_hours: i32) -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(2000, 9, 30, 15, 0, 0)
            .unwrap()
    }

    #[test]
    fn equal_people_compare_equal() {
        assert_eq!(Person::new("p1", "Smith", dob(3)), Person::new("p1", "Smith", dob(3)));
    }

    #[test]
    fn different_first_names_compare_unequal() {
        assert_ne!(Person::new("p1", "Smith", dob(3)), Person::new("p2", "Smith", dob(3)));
    }

    #[test]
    fn same_instant_in_another_zone_compares_equal() {
        let in_utc = Utc
            .with_ymd_and_hms(2000, 9, 30, 12, 0, 0)
            .unwrap()
            .fixed_offset();
        assert_eq!(
            Person::with_id(7, "p1", "Smith", dob(3)),
            Person::with_id(7, "p1", "Smith", in_utc)
        );
    }

    #[test]
    fn identity_is_part_of_equality() {
        assert_ne!(
            Person::with_id(1, "p1", "Smith", dob(0)),
            Person::with_id(2, "p1", "Smith", dob(0))
        );
    }

    #[test]
    fn validate_rejects_blank_names_and_negative_salary() {
        let blank = Person::new("  ", "Smith", dob(0));
        assert_eq!(blank.validate(), Err(ValidationError::BlankField("first_name")));

        let underpaid = Person::new("p1", "Smith", dob(0)).with_salary(Decimal::new(-1, 0));
        assert_eq!(
            underpaid.validate(),
            Err(ValidationError::NegativeSalary(Decimal::new(-1, 0)))
        );
    }
}
