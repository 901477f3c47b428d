// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod error;
pub mod model;
pub mod sanitize;

pub use error::*;
pub use model::*;
pub use sanitize::{HtmlSanitizer, Sanitizer};
