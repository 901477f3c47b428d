// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use quill_common_post::{DraftError, TagNameError};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(sqlx::Error),

	#[error("Timed out waiting for a database connection")]
	Timeout,

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Forbidden: {0}")]
	Forbidden(String),

	#[error("Validation failed: {0}")]
	Validation(String),

	#[error("Identifier space exhausted after {0} attempts")]
	IdentifierExhausted(u32),

	#[error("Partial cascade failure: {0}")]
	PartialCascade(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl From<sqlx::Error> for DbError {
	fn from(err: sqlx::Error) -> Self {
		match err {
			sqlx::Error::PoolTimedOut => DbError::Timeout,
			other => DbError::Sqlx(other),
		}
	}
}

impl From<DraftError> for DbError {
	fn from(err: DraftError) -> Self {
		DbError::Validation(err.to_string())
	}
}

impl From<TagNameError> for DbError {
	fn from(err: TagNameError) -> Self {
		DbError::Validation(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
