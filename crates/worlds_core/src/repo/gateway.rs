//! Persistence gateway: the only place that builds entity SQL.
//!
//! # Responsibility
//! - Get-by-id, insert, update and predicate queries for any [`Table`].
//! - Own transaction boundaries for multi-statement operations.
//!
//! # Invariants
//! - `id` is never written; it is always assigned by SQLite on insert.
//! - Query results are ordered by `id ASC` (insertion order).
//! - A failed transaction body is rolled back before its error propagates.

use crate::db::migrations::{current_version, latest_version};
use crate::model::{EntityId, EntityKind, Record};
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row, Transaction, TransactionBehavior};

const REQUIRED_TABLES: &[&str] = &[
    "champions",
    "teams",
    "match_summaries",
    "match_champion_links",
    "players",
];

/// Row binding for a [`Record`] type.
pub trait Table: Record {
    /// Data columns in bind order. Excludes `id` and `is_deleted`.
    const COLUMNS: &'static [&'static str];
    /// Name-like column used by text search.
    const SEARCH_COLUMN: &'static str;

    /// Values for [`Self::COLUMNS`], same order.
    fn column_values(&self) -> Vec<Value>;

    /// Decodes a row selected as `id, COLUMNS..., is_deleted`.
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// SQL filter built from fixed column names and bound values.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    clauses: Vec<String>,
    binds: Vec<Value>,
}

impl Predicate {
    /// Matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active_only() -> Self {
        Self::all().clause("is_deleted = 0")
    }

    pub fn deleted_only() -> Self {
        Self::all().clause("is_deleted = 1")
    }

    pub fn clause(mut self, clause: &'static str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    pub fn eq(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.clauses.push(format!("{column} = ?"));
        self.binds.push(value.into());
        self
    }

    /// `column_a = value OR column_b = value`.
    pub fn either_eq(
        mut self,
        column_a: &'static str,
        column_b: &'static str,
        value: impl Into<Value>,
    ) -> Self {
        let value = value.into();
        self.clauses
            .push(format!("({column_a} = ? OR {column_b} = ?)"));
        self.binds.push(value.clone());
        self.binds.push(value);
        self
    }

    pub fn at_least(mut self, column: &'static str, value: f64) -> Self {
        self.clauses.push(format!("{column} >= ?"));
        self.binds.push(Value::Real(value));
        self
    }

    /// Case-insensitive substring match. `%` and `_` in `text` match literally.
    pub fn contains(mut self, column: &'static str, text: &str) -> Self {
        self.clauses.push(format!("{column} LIKE ? ESCAPE '\\'"));
        self.binds
            .push(Value::Text(format!("%{}%", escape_like(text))));
        self
    }

    /// `column IN (subquery)`, where the subquery takes exactly one bind.
    pub fn member_of(
        mut self,
        column: &'static str,
        subquery: &'static str,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses.push(format!("{column} IN ({subquery})"));
        self.binds.push(value.into());
        self
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

/// Offset/limit window over an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

/// Gateway over one connection, or over an open transaction.
#[derive(Clone, Copy)]
pub struct SqliteGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGateway<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations are not fully applied.
    /// - `MissingRequiredTable` when an entity table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self { conn })
    }

    pub(crate) fn connection(&self) -> &'conn Connection {
        self.conn
    }

    /// Fetches one row regardless of its tombstone.
    pub fn get_by_id<T: Table>(&self, id: EntityId) -> RepoResult<Option<T>> {
        let sql = format!(
            "{} FROM {} WHERE id = ?1;",
            select_list::<T>(),
            T::KIND.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(T::from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Inserts the record's data columns and returns the stored row.
    ///
    /// The record's own `id` is ignored; the row starts active.
    pub fn insert<T: Table>(&self, record: &T) -> RepoResult<T> {
        let placeholders = (1..=T::COLUMNS.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders});",
            T::KIND.table(),
            T::COLUMNS.join(", ")
        );
        self.conn
            .execute(&sql, params_from_iter(record.column_values()))?;

        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "inserted {} row {id} could not be read back",
                T::KIND
            ))
        })
    }

    /// Writes data columns and the tombstone of an existing row.
    pub fn update<T: Table>(&self, record: &T) -> RepoResult<()> {
        let assignments = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let flag_index = T::COLUMNS.len() + 1;
        let sql = format!(
            "UPDATE {} SET {assignments}, is_deleted = ?{flag_index} WHERE id = ?{};",
            T::KIND.table(),
            flag_index + 1
        );

        let mut values = record.column_values();
        values.push(Value::Integer(i64::from(record.is_deleted())));
        values.push(Value::Integer(record.id()));

        let changed = self.conn.execute(&sql, params_from_iter(values))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: T::KIND,
                id: record.id(),
                operation: "write",
            });
        }
        Ok(())
    }

    /// Runs a filtered, id-ordered query with an optional window.
    pub fn query<T: Table>(&self, predicate: &Predicate, page: Option<Page>) -> RepoResult<Vec<T>> {
        let mut sql = format!(
            "{} FROM {}{} ORDER BY id ASC",
            select_list::<T>(),
            T::KIND.table(),
            predicate.where_sql()
        );
        let mut binds = predicate.binds.clone();
        if let Some(page) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            binds.push(Value::Integer(i64::from(page.limit)));
            binds.push(Value::Integer(i64::from(page.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(T::from_row(row)?);
        }
        Ok(records)
    }

    pub fn count<T: Table>(&self, predicate: &Predicate) -> RepoResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{};",
            T::KIND.table(),
            predicate.where_sql()
        );
        let count: i64 =
            self.conn
                .query_row(&sql, params_from_iter(predicate.binds.clone()), |row| {
                    row.get(0)
                })?;
        Ok(count.max(0) as u64)
    }

    /// Runs `body` inside one immediate transaction.
    ///
    /// Commits when `body` succeeds; rolls back and returns the body's error
    /// otherwise. Immediate mode takes the write lock up front, so two
    /// guarded transitions on the same row serialize.
    pub fn transaction<R>(
        &self,
        kind: EntityKind,
        operation: &'static str,
        body: impl FnOnce(&SqliteGateway<'_>) -> RepoResult<R>,
    ) -> RepoResult<R> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let scoped = SqliteGateway { conn: &tx };

        match body(&scoped) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=tx_rollback module=repo status=error kind={kind} op={operation} error={rollback_err}"
                    );
                }
                warn!(
                    "event=tx_rollback module=repo status=rollback kind={kind} op={operation} storage_failure={} error={err}",
                    err.is_storage_failure()
                );
                Err(err)
            }
        }
    }
}

/// Decodes the 0/1 tombstone column.
pub(crate) fn parse_flag(row: &Row<'_>, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>("is_deleted")? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid is_deleted value `{other}` in {table}.is_deleted"
        ))),
    }
}

fn select_list<T: Table>() -> String {
    format!("SELECT id, {}, is_deleted", T::COLUMNS.join(", "))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
