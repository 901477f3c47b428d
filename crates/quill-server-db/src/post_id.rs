// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Collision-free post identifier generation.
//!
//! Identifiers are 8 characters drawn from a 62-symbol alphabet. Each
//! candidate is checked against the posts relation with a bound-parameter
//! equality select; the loop is bounded and exhaustion surfaces as
//! [`DbError::IdentifierExhausted`]. Run inside the create transaction,
//! SQLite's single-writer transaction closes the window between the existence
//! check and first use.

use rand::Rng;
use sqlx::sqlite::SqliteConnection;

use quill_common_post::{PostId, POST_ID_LEN};

use crate::error::DbError;
use crate::post::{posts_relation, COL_ID};
use crate::relation;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Upper bound on regeneration attempts before giving up.
pub const MAX_GENERATE_ATTEMPTS: u32 = 32;

fn random_candidate() -> PostId {
	let mut rng = rand::thread_rng();
	let id: String = (0..POST_ID_LEN)
		.map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
		.collect();
	PostId::from_string(id)
}

/// Generate an identifier not present among stored post identifiers.
pub async fn generate_unique(conn: &mut SqliteConnection) -> Result<PostId, DbError> {
	generate_unique_with(conn, random_candidate).await
}

async fn generate_unique_with(
	conn: &mut SqliteConnection,
	mut candidates: impl FnMut() -> PostId,
) -> Result<PostId, DbError> {
	for attempt in 0..MAX_GENERATE_ATTEMPTS {
		let candidate = candidates();
		let existing =
			relation::select_by_column(conn, &posts_relation(), COL_ID, candidate.as_str()).await?;
		if existing.is_empty() {
			return Ok(candidate);
		}
		tracing::debug!(attempt, "post id collision, regenerating");
	}

	Err(DbError::IdentifierExhausted(MAX_GENERATE_ATTEMPTS))
}
