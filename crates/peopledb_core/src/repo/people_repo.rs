//! People repository: SQL and column mapping for the `people` table.
//!
//! # Invariants
//! - `dob` is written as a zone-naive UTC instant and read back tagged UTC, so
//!   a reloaded person names the same instant as the one saved.
//! - Write paths call `Person::validate()` before binding values.
//! - Every operation is declared; nothing relies on the override hook.

use crate::model::person::Person;
use crate::repo::crud_repo::{CrudRepository, EntityMapping};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::sql::{CrudOperation, SqlDeclaration};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const SAVE_PERSON_SQL: &str =
    "INSERT INTO people (first_name, last_name, dob, salary, email) VALUES (?, ?, ?, ?, ?)";
pub const FIND_BY_ID_SQL: &str =
    "SELECT id, first_name, last_name, dob, salary, email FROM people WHERE id = ?";
pub const FIND_ALL_SQL: &str =
    "SELECT id, first_name, last_name, dob, salary, email FROM people ORDER BY id";
pub const COUNT_RECORDS_SQL: &str = "SELECT id FROM people";
pub const DELETE_BY_ID_SQL: &str = "DELETE FROM people WHERE id = ?";
pub const DELETE_BY_MULTIPLE_ID_SQL: &str = "DELETE FROM people WHERE id IN (:ids)";
pub const UPDATE_PERSON_SQL: &str =
    "UPDATE people SET first_name = ?, last_name = ?, dob = ?, salary = ?, email = ? WHERE id = ?";

/// Text layout of `people.dob`.
pub(crate) const STORE_INSTANT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Repository over the `people` table.
pub type PeopleRepository<'conn> = CrudRepository<'conn, PeopleMapping>;

/// Column mapping for [`Person`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PeopleMapping;

impl EntityMapping for PeopleMapping {
    type Entity = Person;

    const TABLE: &'static str = "people";

    const DECLARED_SQL: &'static [SqlDeclaration] = &[
        SqlDeclaration::new(CrudOperation::Save, SAVE_PERSON_SQL),
        SqlDeclaration::new(CrudOperation::FindById, FIND_BY_ID_SQL),
        SqlDeclaration::new(CrudOperation::FindAll, FIND_ALL_SQL),
        SqlDeclaration::new(CrudOperation::Count, COUNT_RECORDS_SQL),
        SqlDeclaration::new(CrudOperation::DeleteOne, DELETE_BY_ID_SQL),
        SqlDeclaration::new(CrudOperation::DeleteMany, DELETE_BY_MULTIPLE_ID_SQL),
        SqlDeclaration::new(CrudOperation::Update, UPDATE_PERSON_SQL),
    ];

    fn map_for_save(&self, person: &Person) -> RepoResult<Vec<Value>> {
        person_values(person)
    }

    fn map_for_update(&self, person: &Person) -> RepoResult<Vec<Value>> {
        person_values(person)
    }

    fn extract_entity(&self, row: &Row<'_>) -> RepoResult<Person> {
        let dob_text: String = row.get("dob")?;
        let dob = NaiveDateTime::parse_from_str(&dob_text, STORE_INSTANT_FORMAT)
            .map(from_store_instant)
            .map_err(|_| {
                RepoError::InvalidData(format!("invalid instant `{dob_text}` in people.dob"))
            })?;

        let salary_text: String = row.get("salary")?;
        let salary = Decimal::from_str(&salary_text).map_err(|_| {
            RepoError::InvalidData(format!("invalid decimal `{salary_text}` in people.salary"))
        })?;

        let mut person = Person::with_id(
            row.get("id")?,
            row.get::<_, String>("first_name")?,
            row.get::<_, String>("last_name")?,
            dob,
        )
        .with_salary(salary);
        person.email = row.get("email")?;
        Ok(person)
    }
}

fn person_values(person: &Person) -> RepoResult<Vec<Value>> {
    person.validate()?;
    Ok(vec![
        Value::Text(person.first_name.clone()),
        Value::Text(person.last_name.clone()),
        to_store_instant(&person.dob),
        Value::Text(person.salary.to_string()),
        person.email.clone().map_or(Value::Null, Value::Text),
    ])
}

/// Normalizes a zoned instant to UTC and drops the zone for storage.
pub(crate) fn to_store_instant(instant: &DateTime<FixedOffset>) -> Value {
    Value::Text(
        instant
            .naive_utc()
            .format(STORE_INSTANT_FORMAT)
            .to_string(),
    )
}

/// Tags a stored zone-naive instant with UTC.
pub(crate) fn from_store_instant(stored: NaiveDateTime) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from_naive_utc_and_offset(stored, Utc).into()
}
