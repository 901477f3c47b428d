// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};

use crate::error::DbError;

/// Default upper bound on concurrently held connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default bound on how long an operation may wait for a pooled connection
/// before surfacing [`DbError::Timeout`].
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a SqlitePool with WAL mode and common settings.
///
/// The pool is the sole shared resource of the post store: it is created once
/// at process start and passed by clone into each repository. Acquisition is
/// bounded by [`DEFAULT_ACQUIRE_TIMEOUT`].
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./quill.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	create_pool_with(database_url, DEFAULT_MAX_CONNECTIONS, DEFAULT_ACQUIRE_TIMEOUT).await
}

/// Create a SqlitePool with explicit capacity and acquire-timeout bounds.
pub async fn create_pool_with(
	database_url: &str,
	max_connections: u32,
	acquire_timeout: Duration,
) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.acquire_timeout(acquire_timeout)
		.connect_with(options)
		.await?;

	tracing::debug!(max_connections, "database pool created");
	Ok(pool)
}
