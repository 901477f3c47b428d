// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Media-store collaborator.
//!
//! Each post may own a directory tree of uploaded media keyed by its
//! identifier. The post store requests removal once a delete has committed;
//! a failure here is reported as a partial-cascade condition rather than
//! rolling back the already-committed deletion.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quill_common_post::PostId;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
	#[error("Media I/O error: {0}")]
	Io(#[from] io::Error),
}

/// Removes the media resources associated with a post identifier.
#[async_trait]
pub trait MediaStore: Send + Sync {
	async fn remove_post_media(&self, id: &PostId) -> Result<(), MediaError>;
}

/// Media store backed by a per-post directory under a filesystem root.
pub struct FsMediaStore {
	root: PathBuf,
}

impl FsMediaStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// The directory holding media for `id`.
	pub fn post_dir(&self, id: &PostId) -> PathBuf {
		self.root.join(id.as_str())
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

#[async_trait]
impl MediaStore for FsMediaStore {
	async fn remove_post_media(&self, id: &PostId) -> Result<(), MediaError> {
		match tokio::fs::remove_dir_all(self.post_dir(id)).await {
			Ok(()) => {
				tracing::debug!(post_id = %id, "post media directory removed");
				Ok(())
			}
			// A post that never had uploads has no directory.
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pid(id: &str) -> PostId {
		PostId::parse(id).unwrap()
	}

	#[tokio::test]
	async fn removes_post_directory_tree() {
		let root = tempfile::tempdir().unwrap();
		let store = FsMediaStore::new(root.path());
		let id = pid("abcd1234");

		let dir = store.post_dir(&id);
		std::fs::create_dir_all(dir.join("nested")).unwrap();
		std::fs::write(dir.join("nested").join("banner.png"), b"png").unwrap();

		store.remove_post_media(&id).await.unwrap();
		assert!(!dir.exists());
	}

	#[tokio::test]
	async fn missing_directory_is_a_noop() {
		let root = tempfile::tempdir().unwrap();
		let store = FsMediaStore::new(root.path());

		store.remove_post_media(&pid("abcd1234")).await.unwrap();
	}
}
