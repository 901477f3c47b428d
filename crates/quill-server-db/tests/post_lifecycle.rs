// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! End-to-end post lifecycle: create, contested update, retag, delete.

use std::sync::Arc;

use quill_common_post::{PostDraft, TagName};
use quill_server_auth::Actor;
use quill_server_db::{tag_index, testing, DbError, FsMediaStore, PostRepository};

fn draft(title: &str, tags: &str) -> PostDraft {
	PostDraft {
		title: title.to_string(),
		body: format!("<p>{title}</p>"),
		tags: TagName::parse_list(tags).unwrap(),
		banner: "default".to_string(),
	}
}

async fn tag_lists(repo: &PostRepository, name: &str, id: &str) -> bool {
	let mut conn = repo.pool().acquire().await.unwrap();
	let tag = TagName::parse(name).unwrap();
	tag_index::members(&mut conn, &tag)
		.await
		.unwrap()
		.iter()
		.any(|member| member.as_str() == id)
}

#[tokio::test]
async fn full_post_lifecycle() {
	let pool = testing::create_post_test_pool().await;
	let media_root = tempfile::tempdir().unwrap();
	let repo = PostRepository::new(pool, Arc::new(FsMediaStore::new(media_root.path())));

	let u1 = Actor::new("u1", "u1");
	let u2 = Actor::new("u2", "u2");

	// u1 creates a post tagged go + systems.
	let id = repo
		.create(Some(&u1), &draft("Hello", "Go, Systems"))
		.await
		.unwrap();

	let post = repo.get(&id).await.unwrap();
	assert_eq!(
		post.tags.iter().map(TagName::as_str).collect::<Vec<_>>(),
		vec!["go", "systems"]
	);
	assert_eq!(post.author, "u1");

	// u2 is neither owner nor elevated; the post stays untouched.
	let err = repo
		.update(Some(&u2), &id, &draft("Hijacked", "spam"))
		.await
		.unwrap_err();
	assert!(matches!(err, DbError::Forbidden(_)));
	assert_eq!(repo.get(&id).await.unwrap(), post);

	// u1 swaps systems for rust; the index follows the delta.
	repo.update(Some(&u1), &id, &draft("Hello", "go,rust"))
		.await
		.unwrap();
	assert!(!tag_lists(&repo, "systems", id.as_str()).await);
	assert!(tag_lists(&repo, "rust", id.as_str()).await);
	assert!(tag_lists(&repo, "go", id.as_str()).await);

	// u1 deletes; nothing is left behind.
	repo.delete(Some(&u1), &id).await.unwrap();
	assert!(matches!(repo.get(&id).await, Err(DbError::NotFound(_))));
	assert!(!tag_lists(&repo, "go", id.as_str()).await);
	assert!(!tag_lists(&repo, "rust", id.as_str()).await);
}
