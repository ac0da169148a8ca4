//! Per-operation SQL lookup.
//!
//! # Responsibility
//! - Name the seven CRUD operations a repository can back with SQL.
//! - Pick the SQL text for one operation: declared table first, override second.
//! - Rewrite the delete-many id-list token into a single bound array.
//!
//! # Invariants
//! - A declaration for an operation always shadows the repository's override.
//! - With duplicate declarations the first one wins and a warning is logged.

use crate::repo::error::ConfigError;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// Token a delete-many template uses in place of its id list.
pub const IDS_TOKEN: &str = ":ids";

static IDS_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":ids\b").expect("valid ids token regex"));

/// Operations the CRUD engine resolves SQL for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    Save,
    FindById,
    FindAll,
    Count,
    DeleteOne,
    DeleteMany,
    Update,
}

impl CrudOperation {
    pub const ALL: [CrudOperation; 7] = [
        Self::Save,
        Self::FindById,
        Self::FindAll,
        Self::Count,
        Self::DeleteOne,
        Self::DeleteMany,
        Self::Update,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::FindById => "find_by_id",
            Self::FindAll => "find_all",
            Self::Count => "count",
            Self::DeleteOne => "delete_one",
            Self::DeleteMany => "delete_many",
            Self::Update => "update",
        }
    }
}

impl Display for CrudOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statically declared `operation -> SQL` entry of a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDeclaration {
    pub operation: CrudOperation,
    pub sql: &'static str,
}

impl SqlDeclaration {
    pub const fn new(operation: CrudOperation, sql: &'static str) -> Self {
        Self { operation, sql }
    }
}

/// Resolves the SQL text backing `operation` for `repository`.
///
/// `declared` is searched in order; when nothing matches, `default_sql` is
/// called. It is the repository's override hook and fails with
/// [`ConfigError::SqlNotDefined`] unless the repository provides the text.
pub fn resolve_sql(
    repository: &'static str,
    declared: &'static [SqlDeclaration],
    operation: CrudOperation,
    default_sql: impl FnOnce() -> Result<Cow<'static, str>, ConfigError>,
) -> Result<Cow<'static, str>, ConfigError> {
    let mut matches = declared.iter().filter(|decl| decl.operation == operation);

    if let Some(first) = matches.next() {
        let duplicates = matches.count();
        if duplicates > 0 {
            warn!(
                "event=sql_resolve module=repo status=ambiguous table={} operation={} declarations={} picked=first",
                repository,
                operation,
                duplicates + 1
            );
        }
        debug!("event=sql_resolve module=repo status=ok table={repository} operation={operation} source=declared");
        return Ok(Cow::Borrowed(first.sql));
    }

    let sql = default_sql()?;
    debug!("event=sql_resolve module=repo status=ok table={repository} operation={operation} source=override");
    Ok(sql)
}

/// Subquery every `:ids` token becomes; `?` takes the whole id list.
pub const ID_ARRAY_SUBQUERY: &str = "SELECT value FROM rarray(?)";

/// Replaces every `:ids` token with [`ID_ARRAY_SUBQUERY`].
///
/// Returns the rewritten SQL and the number of token occurrences; the caller
/// binds the id array once per occurrence. The statement length and the
/// bound-variable count do not depend on how many ids are deleted.
pub fn expand_id_list(
    repository: &'static str,
    sql: &str,
) -> Result<(String, usize), ConfigError> {
    let occurrences = IDS_TOKEN_RE.find_iter(sql).count();
    if occurrences == 0 {
        return Err(ConfigError::MissingIdsToken { repository });
    }

    let expanded = IDS_TOKEN_RE.replace_all(sql, NoExpand(ID_ARRAY_SUBQUERY));
    Ok((expanded.into_owned(), occurrences))
}
