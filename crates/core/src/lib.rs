// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! oxbow-core: value model and component seam for the oxbow runtime

pub mod component;
pub mod resolved;
pub mod value;
pub mod wildcard;

pub use component::{Component, ComponentError, ComponentHandle, NativeFn, NativeFuture};
pub use resolved::{LiteralKind, Resolved, ResolvedKind};
pub use value::Value;
pub use wildcard::compare_wildcards;
