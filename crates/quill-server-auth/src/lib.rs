// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

pub mod policy;
pub mod types;

pub use policy::can_mutate;
pub use types::Actor;
