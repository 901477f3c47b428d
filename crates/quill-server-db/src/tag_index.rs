// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Dynamic secondary index of free-form tags.
//!
//! One relation per distinct tag (`tag_<name>`), created lazily on first use
//! and holding the identifiers of the posts carrying that tag. The index has
//! no notion of a post's previous tag-set: the post store computes the delta
//! and instructs adds and removes. Every operation here is idempotent.
//!
//! Operations take a connection so the post store can run them inside the
//! same transaction as the post-row change, keeping membership and tag-set
//! consistent even when a multi-step mutation fails partway.

use sqlx::sqlite::SqliteConnection;
use sqlx::Row;

use quill_common_post::{PostId, TagName};

use crate::error::DbError;
use crate::relation::{self, ColumnName, RelationName, TAG_RELATION_PREFIX};

pub(crate) const COL_POST_ID: ColumnName = ColumnName::from_static("post_id");

const MEMBERSHIP_COLUMN_DECL: &str = "TEXT PRIMARY KEY";

/// Create the relation for a tag if it does not exist.
pub async fn ensure_relation(conn: &mut SqliteConnection, tag: &TagName) -> Result<(), DbError> {
	relation::create_relation_if_absent(
		conn,
		&RelationName::tag(tag),
		COL_POST_ID,
		MEMBERSHIP_COLUMN_DECL,
	)
	.await
}

/// Record that `post_id` carries `tag`. Calling twice leaves exactly one row.
pub async fn add_membership(
	conn: &mut SqliteConnection,
	tag: &TagName,
	post_id: &PostId,
) -> Result<(), DbError> {
	relation::upsert_row(
		conn,
		&RelationName::tag(tag),
		&[COL_POST_ID],
		&[post_id.as_str()],
	)
	.await?;
	tracing::debug!(tag = %tag, post_id = %post_id, "tag membership added");
	Ok(())
}

/// Remove any membership row for `post_id` in `tag`'s relation. Removing an
/// absent membership is a no-op, not an error — including when the tag has
/// never been used and its relation does not exist.
pub async fn remove_membership(
	conn: &mut SqliteConnection,
	tag: &TagName,
	post_id: &PostId,
) -> Result<(), DbError> {
	let relation = RelationName::tag(tag);
	if !relation::relation_exists(conn, &relation).await? {
		return Ok(());
	}
	let removed =
		relation::delete_by_column(conn, &relation, COL_POST_ID, post_id.as_str()).await?;
	tracing::debug!(tag = %tag, post_id = %post_id, removed, "tag membership removed");
	Ok(())
}

/// The post identifiers currently in `tag`'s relation.
///
/// Relations are created lazily, so a tag that has never been used has no
/// relation; its membership set is empty, not an error.
pub async fn members(conn: &mut SqliteConnection, tag: &TagName) -> Result<Vec<PostId>, DbError> {
	let relation = RelationName::tag(tag);
	if !relation::relation_exists(conn, &relation).await? {
		return Ok(Vec::new());
	}
	let rows = relation::select_all(conn, &relation).await?;
	let mut ids = Vec::with_capacity(rows.len());
	for row in rows {
		let id: String = row.try_get(COL_POST_ID.as_str())?;
		ids.push(PostId::from_string(id));
	}
	Ok(ids)
}

/// Every tag that currently has a relation.
pub async fn list_tags(conn: &mut SqliteConnection) -> Result<Vec<TagName>, DbError> {
	let names = relation::list_relations(conn, TAG_RELATION_PREFIX).await?;
	let prefix = format!("{TAG_RELATION_PREFIX}_");
	let mut tags = Vec::with_capacity(names.len());
	for name in names {
		let Some(raw) = name.strip_prefix(&prefix) else {
			continue;
		};
		let tag = TagName::parse(raw)
			.map_err(|err| DbError::Internal(format!("Invalid tag relation '{name}': {err}")))?;
		tags.push(tag);
	}
	Ok(tags)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	fn tag(name: &str) -> TagName {
		TagName::parse(name).unwrap()
	}

	fn pid(id: &str) -> PostId {
		PostId::parse(id).unwrap()
	}

	#[tokio::test]
	async fn add_membership_is_idempotent() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();
		let go = tag("go");
		let post = pid("abcd1234");

		ensure_relation(&mut conn, &go).await.unwrap();
		add_membership(&mut conn, &go, &post).await.unwrap();
		add_membership(&mut conn, &go, &post).await.unwrap();

		assert_eq!(members(&mut conn, &go).await.unwrap(), vec![post]);
	}

	#[tokio::test]
	async fn never_used_tag_has_no_members() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();

		// No ensure_relation: the tag relation does not exist yet.
		assert!(members(&mut conn, &tag("spam")).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn remove_membership_of_never_used_tag_is_a_noop() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();

		remove_membership(&mut conn, &tag("spam"), &pid("abcd1234"))
			.await
			.unwrap();
	}

	#[tokio::test]
	async fn remove_absent_membership_is_a_noop() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();
		let go = tag("go");

		ensure_relation(&mut conn, &go).await.unwrap();
		remove_membership(&mut conn, &go, &pid("abcd1234")).await.unwrap();

		assert!(members(&mut conn, &go).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn ensure_relation_is_idempotent() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();
		let go = tag("go");

		ensure_relation(&mut conn, &go).await.unwrap();
		ensure_relation(&mut conn, &go).await.unwrap();
	}

	#[tokio::test]
	async fn list_tags_reflects_created_relations() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();

		for name in ["rust", "go"] {
			ensure_relation(&mut conn, &tag(name)).await.unwrap();
		}

		let mut tags = list_tags(&mut conn).await.unwrap();
		tags.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		assert_eq!(tags, vec![tag("go"), tag("rust")]);
	}

	#[tokio::test]
	async fn memberships_are_tracked_per_tag() {
		let pool = create_test_pool().await;
		let mut conn = pool.acquire().await.unwrap();
		let go = tag("go");
		let rust = tag("rust");
		let post = pid("abcd1234");

		ensure_relation(&mut conn, &go).await.unwrap();
		ensure_relation(&mut conn, &rust).await.unwrap();
		add_membership(&mut conn, &go, &post).await.unwrap();

		assert_eq!(members(&mut conn, &go).await.unwrap(), vec![post]);
		assert!(members(&mut conn, &rust).await.unwrap().is_empty());
	}
}
