// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Pipeline manifest parsing and rendering

mod parser;
mod render;
mod template;

pub use parser::{load_manifest, parse_manifest, ParseError};
pub use render::render_manifest;
pub use template::{expand_env, interpolate, RUNTIME_VARS};
