// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Post domain model.
//!
//! A post is identified by a short opaque [`PostId`] and carries an ordered,
//! duplicate-free set of normalized [`TagName`]s. Tag names double as relation
//! identifiers in the tag index, which is why their character set is strictly
//! allowlisted after normalization.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DraftError, PostIdError, TagNameError};
use crate::sanitize::Sanitizer;

/// Length of an external post identifier.
pub const POST_ID_LEN: usize = 8;

/// Maximum length of a normalized tag name.
pub const MAX_TAG_NAME_CHARS: usize = 64;

/// Banner reference served when a post has none of its own.
pub const DEFAULT_BANNER: &str = "/media/defaults/banner.png";

/// Placeholder value editors submit to request the default banner.
pub const BANNER_PLACEHOLDER: &str = "default";

// =============================================================================
// PostId
// =============================================================================

/// Externally visible post identifier: 8 characters drawn from `[A-Za-z0-9]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct PostId(String);

impl PostId {
	/// Create a PostId from an existing string without validation.
	/// Use `parse()` if you need validation.
	pub fn from_string(s: String) -> Self {
		Self(s)
	}

	pub fn parse(s: &str) -> Result<Self, PostIdError> {
		let len = s.chars().count();
		if len != POST_ID_LEN {
			return Err(PostIdError::InvalidLength(len));
		}
		if let Some(c) = s.chars().find(|c| !c.is_ascii_alphanumeric()) {
			return Err(PostIdError::InvalidChar(c));
		}
		Ok(Self(s.to_string()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for PostId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for PostId {
	type Err = PostIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<String> for PostId {
	type Error = PostIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<PostId> for String {
	fn from(id: PostId) -> Self {
		id.0
	}
}

// =============================================================================
// TagName
// =============================================================================

/// A normalized tag name.
///
/// Construction trims and lower-cases the input, then rejects anything outside
/// `[a-z0-9_-]`. The allowlist is what makes a tag name safe to embed in a
/// tag-relation identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct TagName(String);

impl TagName {
	pub fn parse(raw: &str) -> Result<Self, TagNameError> {
		let normalized = raw.trim().to_lowercase();
		if normalized.is_empty() {
			return Err(TagNameError::Empty);
		}
		let len = normalized.chars().count();
		if len > MAX_TAG_NAME_CHARS {
			return Err(TagNameError::TooLong {
				max: MAX_TAG_NAME_CHARS,
				got: len,
			});
		}
		if let Some(c) = normalized
			.chars()
			.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
		{
			return Err(TagNameError::InvalidChar(c));
		}
		Ok(Self(normalized))
	}

	/// Parse a comma-delimited tag list into an ordered, duplicate-free set.
	///
	/// Empty segments are skipped, so `"go,, systems"` yields two tags.
	pub fn parse_list(raw: &str) -> Result<Vec<TagName>, TagNameError> {
		let mut tags = Vec::new();
		for segment in raw.split(',') {
			if segment.trim().is_empty() {
				continue;
			}
			let tag = TagName::parse(segment)?;
			if !tags.contains(&tag) {
				tags.push(tag);
			}
		}
		Ok(tags)
	}

	/// Join a tag set back into the stored comma-delimited form.
	pub fn join(tags: &[TagName]) -> String {
		tags.iter()
			.map(TagName::as_str)
			.collect::<Vec<_>>()
			.join(",")
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TagName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl TryFrom<String> for TagName {
	type Error = TagNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::parse(&value)
	}
}

impl From<TagName> for String {
	fn from(tag: TagName) -> Self {
		tag.0
	}
}

// =============================================================================
// Post
// =============================================================================

/// A stored post as returned by the post store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
	pub id: PostId,
	pub title: String,
	pub body: String,
	pub tags: Vec<TagName>,
	pub banner: String,
	pub author: String,
	pub owner_id: String,
	pub created_at: NaiveDate,
}

/// Resolve a stored banner reference, falling back to [`DEFAULT_BANNER`] for
/// an empty or placeholder value.
pub fn resolve_banner(stored: &str) -> String {
	let trimmed = stored.trim();
	if trimmed.is_empty() || trimmed == BANNER_PLACEHOLDER {
		DEFAULT_BANNER.to_string()
	} else {
		trimmed.to_string()
	}
}

// =============================================================================
// PostDraft
// =============================================================================

/// The mutable fields of a post as submitted by an editor.
///
/// Owner, author, identifier, and creation date are assigned by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
	pub title: String,
	pub body: String,
	pub tags: Vec<TagName>,
	pub banner: String,
}

impl PostDraft {
	/// Check that every required field is present.
	pub fn validate(&self) -> Result<(), DraftError> {
		if self.title.trim().is_empty() {
			return Err(DraftError::MissingField("title"));
		}
		if self.body.trim().is_empty() {
			return Err(DraftError::MissingField("body"));
		}
		if self.banner.trim().is_empty() {
			return Err(DraftError::MissingField("banner"));
		}
		Ok(())
	}

	/// Return a copy with title, body, and banner passed through the
	/// sanitizer. Tag names need no sanitization: their character allowlist
	/// cannot express markup.
	pub fn sanitized(&self, sanitizer: &dyn Sanitizer) -> PostDraft {
		PostDraft {
			title: sanitizer.clean(&self.title),
			body: sanitizer.clean(&self.body),
			tags: self.tags.clone(),
			banner: sanitizer.clean(&self.banner),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn post_id_accepts_eight_alphanumerics() {
		let id = PostId::parse("aB3xYz09").unwrap();
		assert_eq!(id.as_str(), "aB3xYz09");
	}

	#[test]
	fn post_id_rejects_wrong_length() {
		assert_eq!(
			PostId::parse("short"),
			Err(PostIdError::InvalidLength(5))
		);
	}

	#[test]
	fn post_id_rejects_punctuation() {
		assert_eq!(
			PostId::parse("abc-ef12"),
			Err(PostIdError::InvalidChar('-'))
		);
	}

	#[test]
	fn post_id_validates_on_conversion_from_owned_string() {
		// The same path serde's try_from deserialization goes through.
		assert!(PostId::try_from("aB3xYz09".to_string()).is_ok());
		assert_eq!(
			PostId::try_from("abc-ef12".to_string()),
			Err(PostIdError::InvalidChar('-'))
		);
	}

	#[test]
	fn tag_name_trims_and_lowercases() {
		let tag = TagName::parse("  Systems ").unwrap();
		assert_eq!(tag.as_str(), "systems");
	}

	#[test]
	fn tag_name_rejects_invalid_characters() {
		assert_eq!(
			TagName::parse("drop table"),
			Err(TagNameError::InvalidChar(' '))
		);
		assert!(TagName::parse("a;b").is_err());
		assert!(TagName::parse("\"quoted\"").is_err());
	}

	#[test]
	fn tag_name_rejects_empty() {
		assert_eq!(TagName::parse("   "), Err(TagNameError::Empty));
	}

	#[test]
	fn tag_list_collapses_duplicates_preserving_order() {
		let tags = TagName::parse_list("Go, systems, go, GO").unwrap();
		assert_eq!(
			tags.iter().map(TagName::as_str).collect::<Vec<_>>(),
			vec!["go", "systems"]
		);
	}

	#[test]
	fn tag_list_skips_empty_segments() {
		let tags = TagName::parse_list("go,, ,rust").unwrap();
		assert_eq!(
			tags.iter().map(TagName::as_str).collect::<Vec<_>>(),
			vec!["go", "rust"]
		);
	}

	#[test]
	fn tag_list_round_trips_through_join() {
		let tags = TagName::parse_list("go,systems").unwrap();
		assert_eq!(TagName::join(&tags), "go,systems");
	}

	#[test]
	fn banner_placeholder_resolves_to_default() {
		assert_eq!(resolve_banner(""), DEFAULT_BANNER);
		assert_eq!(resolve_banner("default"), DEFAULT_BANNER);
		assert_eq!(resolve_banner("/media/x.png"), "/media/x.png");
	}

	#[test]
	fn sanitized_cleans_text_fields_and_keeps_tags() {
		use crate::sanitize::HtmlSanitizer;

		let draft = PostDraft {
			title: "Hello <script>x</script>".to_string(),
			body: "<p>ok</p><script>x</script>".to_string(),
			tags: TagName::parse_list("go").unwrap(),
			banner: "default".to_string(),
		};

		let clean = draft.sanitized(&HtmlSanitizer::new());
		assert!(!clean.title.contains("<script>"));
		assert!(!clean.body.contains("<script>"));
		assert!(clean.body.contains("<p>ok</p>"));
		assert_eq!(clean.tags, draft.tags);
		assert_eq!(clean.banner, "default");
	}

	#[test]
	fn draft_requires_title_body_and_banner() {
		let draft = PostDraft {
			title: String::new(),
			body: "body".to_string(),
			tags: vec![],
			banner: "default".to_string(),
		};
		assert_eq!(draft.validate(), Err(DraftError::MissingField("title")));

		let draft = PostDraft {
			title: "title".to_string(),
			body: "  ".to_string(),
			tags: vec![],
			banner: "default".to_string(),
		};
		assert_eq!(draft.validate(), Err(DraftError::MissingField("body")));

		let draft = PostDraft {
			title: "title".to_string(),
			body: "body".to_string(),
			tags: vec![],
			banner: String::new(),
		};
		assert_eq!(draft.validate(), Err(DraftError::MissingField("banner")));
	}
}
