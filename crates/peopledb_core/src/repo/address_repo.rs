//! Address repository: SQL and column mapping for the `addresses` table.
//!
//! Read, insert and single delete are declared; update and bulk delete come
//! from the `default_sql` override.

use crate::model::address::{Address, Region};
use crate::repo::crud_repo::{CrudRepository, EntityMapping};
use crate::repo::error::{ConfigError, RepoError, RepoResult};
use crate::repo::sql::{CrudOperation, SqlDeclaration};
use rusqlite::types::Value;
use rusqlite::Row;
use std::borrow::Cow;

pub const SAVE_ADDRESS_SQL: &str = "INSERT INTO addresses
    (street_address, address2, city, state, postcode, county, region, country)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";
pub const UPDATE_ADDRESS_SQL: &str = "UPDATE addresses
    SET street_address = ?, address2 = ?, city = ?, state = ?, postcode = ?, county = ?, region = ?, country = ?
    WHERE id = ?";
pub const DELETE_ADDRESSES_SQL: &str = "DELETE FROM addresses WHERE id IN (:ids)";

pub type AddressRepository<'conn> = CrudRepository<'conn, AddressMapping>;

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressMapping;

impl EntityMapping for AddressMapping {
    type Entity = Address;

    const TABLE: &'static str = "addresses";

    const DECLARED_SQL: &'static [SqlDeclaration] = &[
        SqlDeclaration::new(CrudOperation::Save, SAVE_ADDRESS_SQL),
        SqlDeclaration::new(
            CrudOperation::FindById,
            "SELECT id, street_address, address2, city, state, postcode, county, region, country
             FROM addresses WHERE id = ?",
        ),
        SqlDeclaration::new(
            CrudOperation::FindAll,
            "SELECT id, street_address, address2, city, state, postcode, county, region, country
             FROM addresses ORDER BY id",
        ),
        SqlDeclaration::new(CrudOperation::Count, "SELECT id FROM addresses"),
        SqlDeclaration::new(CrudOperation::DeleteOne, "DELETE FROM addresses WHERE id = ?"),
    ];

    fn default_sql(&self, operation: CrudOperation) -> Result<Cow<'static, str>, ConfigError> {
        match operation {
            CrudOperation::Update => Ok(Cow::Borrowed(UPDATE_ADDRESS_SQL)),
            CrudOperation::DeleteMany => Ok(Cow::Borrowed(DELETE_ADDRESSES_SQL)),
            other => Err(ConfigError::sql_not_defined(Self::TABLE, other)),
        }
    }

    fn map_for_save(&self, address: &Address) -> RepoResult<Vec<Value>> {
        address_values(address)
    }

    fn map_for_update(&self, address: &Address) -> RepoResult<Vec<Value>> {
        address_values(address)
    }

    fn extract_entity(&self, row: &Row<'_>) -> RepoResult<Address> {
        let region_text: String = row.get("region")?;
        let region = Region::parse(&region_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid region `{region_text}` in addresses.region"))
        })?;

        let mut address = Address::new(
            row.get::<_, String>("street_address")?,
            row.get::<_, String>("city")?,
            row.get::<_, String>("state")?,
            row.get::<_, String>("postcode")?,
            row.get::<_, String>("county")?,
            region,
            row.get::<_, String>("country")?,
        )
        .rehydrate(row.get("id")?);
        address.address2 = row.get("address2")?;
        Ok(address)
    }
}

fn address_values(address: &Address) -> RepoResult<Vec<Value>> {
    address.validate()?;
    Ok(vec![
        Value::Text(address.street_address.clone()),
        address.address2.clone().map_or(Value::Null, Value::Text),
        Value::Text(address.city.clone()),
        Value::Text(address.state.clone()),
        Value::Text(address.postcode.clone()),
        Value::Text(address.county.clone()),
        Value::Text(address.region.as_str().to_string()),
        Value::Text(address.country.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::{AddressMapping, DELETE_ADDRESSES_SQL, UPDATE_ADDRESS_SQL};
    use crate::repo::crud_repo::EntityMapping;
    use crate::repo::sql::{resolve_sql, CrudOperation};

    const ADDRESS_COLUMNS: &str =
        "id, street_address, address2, city, state, postcode, county, region, country";

    fn resolve(operation: CrudOperation) -> String {
        resolve_sql(
            AddressMapping::TABLE,
            AddressMapping::DECLARED_SQL,
            operation,
            || AddressMapping.default_sql(operation),
        )
        .map(|sql| sql.into_owned())
        .unwrap_or_else(|err| panic!("{operation}: {err}"))
    }

    #[test]
    fn undeclared_operations_fall_back_to_override() {
        assert_eq!(resolve(CrudOperation::Update), UPDATE_ADDRESS_SQL);
        assert_eq!(resolve(CrudOperation::DeleteMany), DELETE_ADDRESSES_SQL);
    }

    #[test]
    fn declared_selects_project_every_column() {
        for operation in [CrudOperation::FindById, CrudOperation::FindAll] {
            assert!(resolve(operation).contains(ADDRESS_COLUMNS));
        }
    }
}
