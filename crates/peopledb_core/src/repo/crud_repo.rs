//! Generic CRUD engine shared by every concrete repository.
//!
//! # Responsibility
//! - Run save/find/count/delete/update against a borrowed SQLite connection.
//! - Resolve SQL per call through the mapping's declarations and overrides.
//! - Read and assign identities through the entity's registered accessor.
//!
//! # Invariants
//! - The engine never opens, closes, commits or rolls back the connection.
//! - `save` assigns exactly the key the store generated for the insert.
//! - `update` binds the identity after every mapping-supplied value.
//! - A lookup that matches nothing returns `None`/empty, never an error.
//! - `delete_many` needs the `rarray` module on the connection; `open_db`
//!   and `open_db_in_memory` load it.

use crate::repo::error::{ConfigError, PersistenceCause, RepoError, RepoResult};
use crate::repo::identity::{Entity, EntityId, IdentityAccessor};
use crate::repo::sql::{expand_id_list, resolve_sql, CrudOperation, SqlDeclaration};
use log::{debug, error, info};
use rusqlite::types::Value;
use rusqlite::vtab::array::Array;
use rusqlite::{params_from_iter, Connection, Params, Row};
use std::borrow::Cow;
use std::rc::Rc;
use std::time::Instant;

/// Entity-specific half of a repository: SQL, parameter binding, row decoding.
///
/// Only the binders and the extractor are mandatory. SQL comes from
/// [`EntityMapping::DECLARED_SQL`] first and [`EntityMapping::default_sql`]
/// second.
pub trait EntityMapping {
    type Entity: Entity;

    /// Table name, used in log events and configuration errors.
    const TABLE: &'static str;

    /// Declared SQL per operation. Shadows `default_sql` for the same operation.
    const DECLARED_SQL: &'static [SqlDeclaration] = &[];

    /// Override hook for operations without a declaration.
    fn default_sql(&self, operation: CrudOperation) -> Result<Cow<'static, str>, ConfigError> {
        Err(ConfigError::sql_not_defined(Self::TABLE, operation))
    }

    /// Values for the insert placeholders, in column order.
    fn map_for_save(&self, entity: &Self::Entity) -> RepoResult<Vec<Value>>;

    /// Values for the update placeholders, identity excluded.
    fn map_for_update(&self, entity: &Self::Entity) -> RepoResult<Vec<Value>>;

    /// Builds a fully populated entity, identity included, from one row.
    fn extract_entity(&self, row: &Row<'_>) -> RepoResult<Self::Entity>;
}

/// SQLite-backed repository for one entity mapping.
pub struct CrudRepository<'conn, M: EntityMapping> {
    conn: &'conn Connection,
    mapping: M,
}

impl<'conn, M: EntityMapping + Default> CrudRepository<'conn, M> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_mapping(conn, M::default())
    }
}

impl<'conn, M: EntityMapping> CrudRepository<'conn, M> {
    pub fn with_mapping(conn: &'conn Connection, mapping: M) -> Self {
        Self { conn, mapping }
    }

    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    /// Returns the SQL text `operation` will execute.
    pub fn resolve_sql(&self, operation: CrudOperation) -> RepoResult<Cow<'static, str>> {
        let sql = resolve_sql(M::TABLE, M::DECLARED_SQL, operation, || {
            self.mapping.default_sql(operation)
        })?;
        Ok(sql)
    }

    /// Inserts `entity` and returns it with the store-generated identity set.
    ///
    /// # Errors
    /// - `Configuration` when the entity has no usable identity registration or
    ///   no save SQL resolves.
    /// - `Persistence` when the entity is already saved, the insert fails, or
    ///   the store generates no key.
    pub fn save(&self, mut entity: M::Entity) -> RepoResult<M::Entity> {
        let started_at = Instant::now();
        let identity = IdentityAccessor::<M::Entity>::resolve()?;
        if let Some(id) = identity.get(&entity) {
            return Err(RepoError::persistence(
                &entity,
                PersistenceCause::AlreadyPersisted(id),
            ));
        }

        let sql = self.resolve_sql(CrudOperation::Save)?;
        let values = self.mapping.map_for_save(&entity)?;

        let inserted = match self.execute(&sql, params_from_iter(values)) {
            Ok(inserted) => inserted,
            Err(err) => {
                error!(
                    "event=repo_save module=repo status=error table={} duration_ms={} error={}",
                    M::TABLE,
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(RepoError::persistence(&entity, err));
            }
        };
        if inserted == 0 {
            return Err(RepoError::persistence(
                &entity,
                PersistenceCause::NoGeneratedKey,
            ));
        }

        let id = self.conn.last_insert_rowid();
        identity.set(&mut entity, id);
        info!(
            "event=repo_save module=repo status=ok table={} id={} duration_ms={}",
            M::TABLE,
            id,
            started_at.elapsed().as_millis()
        );
        Ok(entity)
    }

    /// Loads one entity by identity.
    ///
    /// When the query yields several rows the last one read is returned.
    pub fn find_by_id(&self, id: EntityId) -> RepoResult<Option<M::Entity>> {
        let sql = self.resolve_sql(CrudOperation::FindById)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;

        let mut found = None;
        while let Some(row) = rows.next()? {
            found = Some(self.mapping.extract_entity(row)?);
        }
        debug!(
            "event=repo_find_by_id module=repo status=ok table={} id={} found={}",
            M::TABLE,
            id,
            found.is_some()
        );
        Ok(found)
    }

    /// Loads every entity, in the order the query returns them.
    pub fn find_all(&self) -> RepoResult<Vec<M::Entity>> {
        let sql = self.resolve_sql(CrudOperation::FindAll)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(self.mapping.extract_entity(row)?);
        }
        debug!(
            "event=repo_find_all module=repo status=ok table={} rows={}",
            M::TABLE,
            entities.len()
        );
        Ok(entities)
    }

    /// Counts the rows the count query returns.
    ///
    /// The query is expected to project one row per entity; rows are counted
    /// here rather than read from a SQL aggregate.
    pub fn count(&self) -> RepoResult<u64> {
        let sql = self.resolve_sql(CrudOperation::Count)?;
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let mut count = 0;
        while rows.next()?.is_some() {
            count += 1;
        }
        debug!(
            "event=repo_count module=repo status=ok table={} count={}",
            M::TABLE,
            count
        );
        Ok(count)
    }

    /// Deletes one saved entity. Affected rows are logged, not returned.
    pub fn delete(&self, entity: &M::Entity) -> RepoResult<()> {
        let identity = IdentityAccessor::<M::Entity>::resolve()?;
        let id = identity.get(entity).ok_or_else(|| missing_identity(entity))?;
        let sql = self.resolve_sql(CrudOperation::DeleteOne)?;

        let affected = self.execute(&sql, [id])?;
        info!(
            "event=repo_delete module=repo status=ok table={} id={} affected={}",
            M::TABLE,
            id,
            affected
        );
        Ok(())
    }

    /// Deletes several saved entities with a single statement.
    ///
    /// Every `:ids` token of the resolved SQL becomes a `rarray(?)` subquery
    /// bound to the full id list, so one statement handles any number of
    /// entities. An empty slice does not touch the store.
    pub fn delete_many(&self, entities: &[M::Entity]) -> RepoResult<()> {
        if entities.is_empty() {
            return Ok(());
        }

        let identity = IdentityAccessor::<M::Entity>::resolve()?;
        let ids = entities
            .iter()
            .map(|entity| identity.get(entity).ok_or_else(|| missing_identity(entity)))
            .collect::<RepoResult<Vec<EntityId>>>()?;

        let template = self.resolve_sql(CrudOperation::DeleteMany)?;
        let (sql, occurrences) = expand_id_list(M::TABLE, &template)?;
        let id_array: Array = Rc::new(ids.iter().copied().map(Value::Integer).collect());

        let affected = self.execute(&sql, params_from_iter(vec![id_array; occurrences]))?;
        info!(
            "event=repo_delete_many module=repo status=ok table={} requested={} affected={}",
            M::TABLE,
            ids.len(),
            affected
        );
        Ok(())
    }

    /// Writes the mapping's update values for a saved entity.
    ///
    /// # Errors
    /// - `Persistence` when the entity was never saved or the store rejects
    ///   the statement.
    pub fn update(&self, entity: &M::Entity) -> RepoResult<()> {
        let identity = IdentityAccessor::<M::Entity>::resolve()?;
        let Some(id) = identity.get(entity) else {
            return Err(RepoError::persistence(
                entity,
                PersistenceCause::MissingIdentity,
            ));
        };

        let sql = self.resolve_sql(CrudOperation::Update)?;
        let mut values = self.mapping.map_for_update(entity)?;
        values.push(Value::Integer(id));

        let affected = self
            .execute(&sql, params_from_iter(values))
            .map_err(|err| RepoError::persistence(entity, err))?;
        info!(
            "event=repo_update module=repo status=ok table={} id={} affected={}",
            M::TABLE,
            id,
            affected
        );
        Ok(())
    }

    fn execute(&self, sql: &str, params: impl Params) -> rusqlite::Result<usize> {
        let mut stmt = self.conn.prepare(sql)?;
        stmt.execute(params)
    }
}

fn missing_identity(entity: &impl std::fmt::Debug) -> RepoError {
    RepoError::MissingIdentity {
        entity: format!("{entity:?}"),
    }
}
