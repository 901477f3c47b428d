// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Acting identity supplied by the session layer.

use serde::{Deserialize, Serialize};

/// The authenticated identity performing a request.
///
/// Actors are not persisted by the post store; the session collaborator
/// supplies one per request and the store borrows it for the duration of the
/// operation. An anonymous request carries no actor at all and is denied at
/// the mutation entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	/// Opaque owning-actor identifier, matched against a post's `owner_id`.
	pub id: String,
	/// Display name recorded as the author of posts this actor creates.
	pub display_name: String,
	/// Elevated privilege: may mutate any post regardless of ownership.
	pub is_admin: bool,
}

impl Actor {
	pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
			is_admin: false,
		}
	}

	pub fn admin(id: impl Into<String>, display_name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			display_name: display_name.into(),
			is_admin: true,
		}
	}
}
