// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTML sanitization boundary.
//!
//! Post titles, bodies, and banner references are sanitized before they reach
//! the post store; the stored value is served verbatim afterwards.

/// Boundary collaborator that turns raw text into text safe to store and
/// render.
pub trait Sanitizer: Send + Sync {
	fn clean(&self, raw: &str) -> String;
}

/// Sanitizer backed by ammonia, stripping executable markup while keeping
/// ordinary formatting tags.
pub struct HtmlSanitizer {
	cleaner: ammonia::Builder<'static>,
}

impl HtmlSanitizer {
	pub fn new() -> Self {
		let mut cleaner = ammonia::Builder::default();
		cleaner
			.strip_comments(true)
			.add_tags(&["span", "figure", "figcaption"])
			.link_rel(Some("noopener noreferrer"))
			.rm_tags(&["script", "link", "iframe", "object", "embed"]);
		Self { cleaner }
	}
}

impl Default for HtmlSanitizer {
	fn default() -> Self {
		Self::new()
	}
}

impl Sanitizer for HtmlSanitizer {
	fn clean(&self, raw: &str) -> String {
		self.cleaner.clean(raw).to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_script_tags() {
		let sanitizer = HtmlSanitizer::new();
		let cleaned = sanitizer.clean("hello <script>alert(1)</script>world");
		assert!(!cleaned.contains("<script>"));
		assert!(cleaned.contains("hello"));
		assert!(cleaned.contains("world"));
	}

	#[test]
	fn keeps_basic_formatting() {
		let sanitizer = HtmlSanitizer::new();
		let cleaned = sanitizer.clean("<p>a <em>post</em></p>");
		assert_eq!(cleaned, "<p>a <em>post</em></p>");
	}

	#[test]
	fn strips_event_handlers() {
		let sanitizer = HtmlSanitizer::new();
		let cleaned = sanitizer.clean(r#"<img src="x" onerror="alert(1)">"#);
		assert!(!cleaned.contains("onerror"));
	}
}
