// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-adapters: Trait seams between the worker and the controlling master.
//!
//! The worker never talks to the RPC transport directly. Commands hold an
//! [`UpdateSink`] for status updates and, for transfers, a [`RemotePeer`]
//! that services chunked `read`/`write`/`unpack`/`close` round-trips.

pub mod peer;
pub mod sink;
pub mod waits;

pub use peer::{PeerError, RemotePeer};
pub use sink::UpdateSink;
pub use waits::{WaitError, WaitFactory, WaitFuture, WaitRegistry};

#[cfg(any(test, feature = "test-support"))]
pub use peer::{FakePeer, PeerOp};
#[cfg(any(test, feature = "test-support"))]
pub use sink::FakeSink;
