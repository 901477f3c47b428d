// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Ownership policy evaluation.
//!
//! Policy decisions are pure functions with no side effects, making them easy
//! to test and reason about. The post store is responsible for translating a
//! denial into a `Forbidden` error only after confirming the post exists, so
//! callers cannot probe for existence through the authorization gate.

use tracing::instrument;

use crate::types::Actor;

/// Evaluates whether an actor may mutate the post owned by `owner_id`.
///
/// Permitted when the actor holds elevated privilege, when the actor's
/// identifier matches the existing owner, or unconditionally when there is no
/// existing owner (the new-post case — ownership is assigned to the creating
/// actor).
#[instrument(
	level = "debug",
	skip(actor),
	fields(actor_id = %actor.id, is_admin = actor.is_admin)
)]
pub fn can_mutate(actor: &Actor, owner_id: Option<&str>) -> bool {
	if actor.is_admin {
		return true;
	}

	match owner_id {
		Some(owner) => actor.id == owner,
		None => true,
	}
}
