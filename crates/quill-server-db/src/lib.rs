// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tag-indexed post store.
//!
//! The persistence core of the Quill blog subsystem: post lifecycle, the
//! per-tag membership index, collision-free identifier generation, and the
//! ownership gate on mutations. All access goes through one bounded
//! [`sqlx::SqlitePool`] created at process start.

pub mod error;
pub mod media;
pub mod pool;
pub mod post;
pub mod post_id;
pub mod relation;
pub mod schema;
pub mod tag_index;
pub mod testing;

pub use error::DbError;
pub use media::{FsMediaStore, MediaError, MediaStore};
pub use pool::{create_pool, create_pool_with};
pub use post::{PostRepository, PostStore};
pub use relation::SortDirection;
pub use schema::ensure_schema;
