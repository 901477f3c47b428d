// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostIdError {
	#[error("Post id must be exactly 8 characters, got {0}")]
	InvalidLength(usize),

	#[error("Post id contains invalid character '{0}'")]
	InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagNameError {
	#[error("Tag name is empty after normalization")]
	Empty,

	#[error("Tag name must be at most {max} characters, got {got}")]
	TooLong { max: usize, got: usize },

	#[error("Tag name contains invalid character '{0}'")]
	InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
	#[error("Required field missing: {0}")]
	MissingField(&'static str),
}
