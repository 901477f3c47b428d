// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Generic relational accessor.
//!
//! Relation and column identifiers are supplied as data rather than as a
//! fixed compile-time schema, which makes the accessor a trust boundary:
//! identifiers can only be constructed from compile-time literals
//! ([`ColumnName`], [`RelationName::from_static`]) or from a validated
//! [`TagName`] ([`RelationName::tag`]), and every value is bound as a query
//! parameter, never interpolated into SQL text.
//!
//! Every operation borrows one connection for its duration. Callers control
//! scoping: pass a scoped pool acquisition for a standalone read, or an open
//! transaction to compose several operations atomically. No operation retries
//! automatically; failures surface as [`DbError`].

use sqlx::sqlite::{SqliteConnection, SqliteRow};

use quill_common_post::TagName;

use crate::error::DbError;

/// Prefix shared by every tag relation, forming the tag logical group.
pub const TAG_RELATION_PREFIX: &str = "tag";

/// A column identifier. Only constructible from compile-time literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnName(&'static str);

impl ColumnName {
	pub const fn from_static(name: &'static str) -> Self {
		Self(name)
	}

	pub fn as_str(&self) -> &str {
		self.0
	}
}

/// A relation identifier.
///
/// Either a fixed relation known at compile time, or a member of the tag
/// logical group derived from a normalized [`TagName`] whose character
/// allowlist (`[a-z0-9_-]`) keeps the interpolated identifier inert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationName(String);

impl RelationName {
	pub fn from_static(name: &'static str) -> Self {
		Self(name.to_string())
	}

	/// The relation holding membership rows for `tag`.
	pub fn tag(tag: &TagName) -> Self {
		Self(format!("{TAG_RELATION_PREFIX}_{tag}"))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

/// Ordering applied by [`select_ordered`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Ascending,
	Descending,
}

impl SortDirection {
	fn as_sql(self) -> &'static str {
		match self {
			SortDirection::Ascending => "ASC",
			SortDirection::Descending => "DESC",
		}
	}
}

/// Insert or replace one row, binding every value as a parameter.
pub async fn upsert_row(
	conn: &mut SqliteConnection,
	relation: &RelationName,
	columns: &[ColumnName],
	values: &[&str],
) -> Result<(), DbError> {
	if columns.len() != values.len() {
		return Err(DbError::Internal(format!(
			"Column/value arity mismatch: {} columns, {} values",
			columns.len(),
			values.len()
		)));
	}

	let column_list = quoted_columns(columns);
	let placeholders = vec!["?"; values.len()].join(", ");
	let sql = format!(
		r#"INSERT OR REPLACE INTO "{}" ({column_list}) VALUES ({placeholders})"#,
		relation.as_str()
	);

	let mut query = sqlx::query(&sql);
	for value in values {
		query = query.bind(*value);
	}
	query.execute(&mut *conn).await?;

	Ok(())
}

/// Select every row of a relation.
pub async fn select_all(
	conn: &mut SqliteConnection,
	relation: &RelationName,
) -> Result<Vec<SqliteRow>, DbError> {
	let sql = format!(r#"SELECT * FROM "{}""#, relation.as_str());
	let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
	Ok(rows)
}

/// Select rows where one column equals a bound value.
pub async fn select_by_column(
	conn: &mut SqliteConnection,
	relation: &RelationName,
	column: ColumnName,
	value: &str,
) -> Result<Vec<SqliteRow>, DbError> {
	let sql = format!(
		r#"SELECT * FROM "{}" WHERE "{}" = ?1"#,
		relation.as_str(),
		column.as_str()
	);
	let rows = sqlx::query(&sql).bind(value).fetch_all(&mut *conn).await?;
	Ok(rows)
}

/// Select all rows ordered by one column, with an optional row limit.
pub async fn select_ordered(
	conn: &mut SqliteConnection,
	relation: &RelationName,
	order_by: ColumnName,
	direction: SortDirection,
	limit: Option<u32>,
) -> Result<Vec<SqliteRow>, DbError> {
	let sql = format!(
		r#"SELECT * FROM "{}" ORDER BY "{}" {}"#,
		relation.as_str(),
		order_by.as_str(),
		direction.as_sql()
	);

	let rows = match limit {
		Some(limit) => {
			let sql = format!("{sql} LIMIT ?1");
			sqlx::query(&sql).bind(limit).fetch_all(&mut *conn).await?
		}
		None => sqlx::query(&sql).fetch_all(&mut *conn).await?,
	};
	Ok(rows)
}

/// Create a relation with one declared column if it does not already exist.
/// Idempotent: no error when the relation is already present.
pub async fn create_relation_if_absent(
	conn: &mut SqliteConnection,
	relation: &RelationName,
	column: ColumnName,
	column_decl: &'static str,
) -> Result<(), DbError> {
	let sql = format!(
		r#"CREATE TABLE IF NOT EXISTS "{}" ("{}" {column_decl})"#,
		relation.as_str(),
		column.as_str()
	);
	sqlx::query(&sql).execute(&mut *conn).await?;
	Ok(())
}

/// Whether a relation currently exists.
pub async fn relation_exists(
	conn: &mut SqliteConnection,
	relation: &RelationName,
) -> Result<bool, DbError> {
	let row: Option<(String,)> =
		sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
			.bind(relation.as_str())
			.fetch_optional(&mut *conn)
			.await?;
	Ok(row.is_some())
}

/// Enumerate relation names belonging to a logical group (`<group>_*`).
///
/// GLOB is used instead of LIKE so that underscores in relation names stay
/// literal; the pattern is bound as a parameter.
pub async fn list_relations(
	conn: &mut SqliteConnection,
	group: &str,
) -> Result<Vec<String>, DbError> {
	let pattern = format!("{group}_*");
	let rows: Vec<(String,)> =
		sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name GLOB ?1")
			.bind(&pattern)
			.fetch_all(&mut *conn)
			.await?;
	Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Delete rows where one column equals a bound value, returning the number
/// of rows removed. Deleting nothing is not an error.
pub async fn delete_by_column(
	conn: &mut SqliteConnection,
	relation: &RelationName,
	column: ColumnName,
	value: &str,
) -> Result<u64, DbError> {
	let sql = format!(
		r#"DELETE FROM "{}" WHERE "{}" = ?1"#,
		relation.as_str(),
		column.as_str()
	);
	let result = sqlx::query(&sql).bind(value).execute(&mut *conn).await?;
	Ok(result.rows_affected())
}

fn quoted_columns(columns: &[ColumnName]) -> String {
	columns
		.iter()
		.map(|c| format!(r#""{}""#, c.as_str()))
		.collect::<Vec<_>>()
		.join(", ")
}
