// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Post repository for database operations.
//!
//! Owns the post lifecycle (create, get, update, delete, ordered listing),
//! delegates tag membership changes to the tag index, and coordinates the
//! authorization gate. Every multi-step mutation runs inside one transaction
//! scoped to one connection, so a failure partway rolls back both the post
//! row and the tag-index changes; only the media cascade runs after commit.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqliteRow};
use sqlx::Row;

use quill_common_post::{resolve_banner, Post, PostDraft, PostId, TagName};
use quill_server_auth::{can_mutate, Actor};

use crate::error::DbError;
use crate::media::MediaStore;
use crate::relation::{self, ColumnName, RelationName, SortDirection};
use crate::{post_id, tag_index};

pub(crate) const COL_ID: ColumnName = ColumnName::from_static("id");
const COL_TITLE: ColumnName = ColumnName::from_static("title");
const COL_BODY: ColumnName = ColumnName::from_static("body");
const COL_TAGS: ColumnName = ColumnName::from_static("tags");
const COL_BANNER: ColumnName = ColumnName::from_static("banner");
const COL_AUTHOR: ColumnName = ColumnName::from_static("author");
const COL_OWNER_ID: ColumnName = ColumnName::from_static("owner_id");
pub(crate) const COL_CREATED_AT: ColumnName = ColumnName::from_static("created_at");

pub(crate) const POST_COLUMNS: &[ColumnName] = &[
	COL_ID,
	COL_TITLE,
	COL_BODY,
	COL_TAGS,
	COL_BANNER,
	COL_AUTHOR,
	COL_OWNER_ID,
	COL_CREATED_AT,
];

const CREATED_AT_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn posts_relation() -> RelationName {
	RelationName::from_static("posts")
}

/// Trait for post store operations.
#[async_trait]
pub trait PostStore: Send + Sync {
	async fn generate_id(&self) -> Result<PostId, DbError>;

	async fn create(&self, actor: Option<&Actor>, draft: &PostDraft) -> Result<PostId, DbError>;

	async fn get(&self, id: &PostId) -> Result<Post, DbError>;

	async fn update(
		&self,
		actor: Option<&Actor>,
		id: &PostId,
		draft: &PostDraft,
	) -> Result<Post, DbError>;

	async fn delete(&self, actor: Option<&Actor>, id: &PostId) -> Result<(), DbError>;

	async fn list_ordered(&self, direction: SortDirection) -> Result<Vec<Post>, DbError>;
}

/// Repository for post database operations.
#[derive(Clone)]
pub struct PostRepository {
	pool: SqlitePool,
	media: Arc<dyn MediaStore>,
}

impl PostRepository {
	/// Create a new repository from an existing pool and media collaborator.
	pub fn new(pool: SqlitePool, media: Arc<dyn MediaStore>) -> Self {
		Self { pool, media }
	}

	/// Get the underlying database pool.
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Reserve a fresh identifier without persisting anything.
	///
	/// Editors call this before the first save so the identifier is known up
	/// front (media uploads are keyed by it).
	#[tracing::instrument(skip(self))]
	pub async fn generate_id(&self) -> Result<PostId, DbError> {
		let mut conn = self.pool.acquire().await?;
		post_id::generate_unique(&mut conn).await
	}

	/// Create a post owned by the acting identity, returning its identifier.
	#[tracing::instrument(skip(self, actor, draft))]
	pub async fn create(
		&self,
		actor: Option<&Actor>,
		draft: &PostDraft,
	) -> Result<PostId, DbError> {
		let actor = require_actor(actor)?;
		draft.validate()?;

		let created_at = Utc::now().date_naive();
		let mut tx = self.pool.begin().await?;

		let id = post_id::generate_unique(&mut tx).await?;
		upsert_post_row(
			&mut tx,
			&id,
			draft,
			&actor.display_name,
			&actor.id,
			created_at,
		)
		.await?;
		for tag in &draft.tags {
			tag_index::ensure_relation(&mut tx, tag).await?;
			tag_index::add_membership(&mut tx, tag, &id).await?;
		}

		tx.commit().await?;
		tracing::info!(post_id = %id, owner_id = %actor.id, "post created");
		Ok(id)
	}

	/// Get a post by identifier.
	#[tracing::instrument(skip(self), fields(post_id = %id))]
	pub async fn get(&self, id: &PostId) -> Result<Post, DbError> {
		let mut conn = self.pool.acquire().await?;
		let row = fetch_post_row(&mut conn, id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("Post {id} not found")))?;
		post_from_row(&row)
	}

	/// Replace a post in place, applying the tag-set delta to the tag index.
	///
	/// Identifier, owner, author, and creation date are preserved from the
	/// existing row.
	#[tracing::instrument(skip(self, actor, draft), fields(post_id = %id))]
	pub async fn update(
		&self,
		actor: Option<&Actor>,
		id: &PostId,
		draft: &PostDraft,
	) -> Result<Post, DbError> {
		let actor = require_actor(actor)?;
		draft.validate()?;

		let mut tx = self.pool.begin().await?;

		let row = fetch_post_row(&mut tx, id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("Post {id} not found")))?;
		let existing = post_from_row(&row)?;

		if !can_mutate(actor, Some(&existing.owner_id)) {
			return Err(DbError::Forbidden(format!(
				"Actor {} may not mutate post {id}",
				actor.id
			)));
		}

		let removed: Vec<TagName> = existing
			.tags
			.iter()
			.filter(|tag| !draft.tags.contains(tag))
			.cloned()
			.collect();
		let added: Vec<TagName> = draft
			.tags
			.iter()
			.filter(|tag| !existing.tags.contains(tag))
			.cloned()
			.collect();

		upsert_post_row(
			&mut tx,
			id,
			draft,
			&existing.author,
			&existing.owner_id,
			existing.created_at,
		)
		.await?;
		for tag in &removed {
			tag_index::remove_membership(&mut tx, tag, id).await?;
		}
		for tag in &added {
			tag_index::ensure_relation(&mut tx, tag).await?;
			tag_index::add_membership(&mut tx, tag, id).await?;
		}

		tx.commit().await?;
		tracing::info!(
			post_id = %id,
			added = added.len(),
			removed = removed.len(),
			"post updated"
		);

		Ok(Post {
			id: id.clone(),
			title: draft.title.clone(),
			body: draft.body.clone(),
			tags: draft.tags.clone(),
			banner: resolve_banner(&draft.banner),
			author: existing.author,
			owner_id: existing.owner_id,
			created_at: existing.created_at,
		})
	}

	/// Delete a post, cascading over its tag memberships and media.
	///
	/// Tag cleanup precedes row deletion. Media removal runs only after the
	/// deletion has committed; its failure is surfaced as
	/// [`DbError::PartialCascade`] without rolling anything back.
	#[tracing::instrument(skip(self, actor), fields(post_id = %id))]
	pub async fn delete(&self, actor: Option<&Actor>, id: &PostId) -> Result<(), DbError> {
		let actor = require_actor(actor)?;

		let mut tx = self.pool.begin().await?;

		let row = fetch_post_row(&mut tx, id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("Post {id} not found")))?;
		let existing = post_from_row(&row)?;

		if !can_mutate(actor, Some(&existing.owner_id)) {
			return Err(DbError::Forbidden(format!(
				"Actor {} may not delete post {id}",
				actor.id
			)));
		}

		for tag in &existing.tags {
			tag_index::remove_membership(&mut tx, tag, id).await?;
		}
		relation::delete_by_column(&mut tx, &posts_relation(), COL_ID, id.as_str()).await?;

		tx.commit().await?;
		tracing::info!(post_id = %id, "post deleted");

		if let Err(err) = self.media.remove_post_media(id).await {
			tracing::error!(post_id = %id, error = %err, "media cleanup failed after post deletion");
			return Err(DbError::PartialCascade(format!(
				"Post {id} deleted but media cleanup failed: {err}"
			)));
		}

		Ok(())
	}

	/// List all posts ordered by creation date.
	#[tracing::instrument(skip(self))]
	pub async fn list_ordered(&self, direction: SortDirection) -> Result<Vec<Post>, DbError> {
		let mut conn = self.pool.acquire().await?;
		let rows = relation::select_ordered(
			&mut conn,
			&posts_relation(),
			COL_CREATED_AT,
			direction,
			None,
		)
		.await?;
		rows.iter().map(post_from_row).collect()
	}
}

#[async_trait]
impl PostStore for PostRepository {
	async fn generate_id(&self) -> Result<PostId, DbError> {
		self.generate_id().await
	}

	async fn create(&self, actor: Option<&Actor>, draft: &PostDraft) -> Result<PostId, DbError> {
		self.create(actor, draft).await
	}

	async fn get(&self, id: &PostId) -> Result<Post, DbError> {
		self.get(id).await
	}

	async fn update(
		&self,
		actor: Option<&Actor>,
		id: &PostId,
		draft: &PostDraft,
	) -> Result<Post, DbError> {
		self.update(actor, id, draft).await
	}

	async fn delete(&self, actor: Option<&Actor>, id: &PostId) -> Result<(), DbError> {
		self.delete(actor, id).await
	}

	async fn list_ordered(&self, direction: SortDirection) -> Result<Vec<Post>, DbError> {
		self.list_ordered(direction).await
	}
}

fn require_actor(actor: Option<&Actor>) -> Result<&Actor, DbError> {
	actor.ok_or_else(|| DbError::Forbidden("Authentication required for post mutations".to_string()))
}

async fn fetch_post_row(
	conn: &mut SqliteConnection,
	id: &PostId,
) -> Result<Option<SqliteRow>, DbError> {
	let rows = relation::select_by_column(conn, &posts_relation(), COL_ID, id.as_str()).await?;
	Ok(rows.into_iter().next())
}

async fn upsert_post_row(
	conn: &mut SqliteConnection,
	id: &PostId,
	draft: &PostDraft,
	author: &str,
	owner_id: &str,
	created_at: NaiveDate,
) -> Result<(), DbError> {
	let tags = TagName::join(&draft.tags);
	let created = created_at.format(CREATED_AT_FORMAT).to_string();
	relation::upsert_row(
		conn,
		&posts_relation(),
		POST_COLUMNS,
		&[
			id.as_str(),
			&draft.title,
			&draft.body,
			&tags,
			&draft.banner,
			author,
			owner_id,
			&created,
		],
	)
	.await
}

fn post_from_row(row: &SqliteRow) -> Result<Post, DbError> {
	let id: String = row.try_get(COL_ID.as_str())?;
	let tags_raw: String = row.try_get(COL_TAGS.as_str())?;
	let banner_raw: String = row.try_get(COL_BANNER.as_str())?;
	let created_raw: String = row.try_get(COL_CREATED_AT.as_str())?;

	let tags = TagName::parse_list(&tags_raw)
		.map_err(|err| DbError::Internal(format!("Stored tag list invalid: {err}")))?;
	let created_at = NaiveDate::parse_from_str(&created_raw, CREATED_AT_FORMAT)
		.map_err(|err| DbError::Internal(format!("Stored creation date invalid: {err}")))?;

	Ok(Post {
		id: PostId::from_string(id),
		title: row.try_get(COL_TITLE.as_str())?,
		body: row.try_get(COL_BODY.as_str())?,
		tags,
		banner: resolve_banner(&banner_raw),
		author: row.try_get(COL_AUTHOR.as_str())?,
		owner_id: row.try_get(COL_OWNER_ID.as_str())?,
		created_at,
	})
}
