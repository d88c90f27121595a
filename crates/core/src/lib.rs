// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-core: Core types for the Piecework worker agent

pub mod args;
pub mod update;

pub use args::{resolve_fake, resolve_real, Arg};
pub use update::{StreamId, Update};
