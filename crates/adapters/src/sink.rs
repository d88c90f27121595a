// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel carrying status updates from a command back to its controller.

use pw_core::Update;

/// Receives ordered status updates from a running command.
///
/// `send` is fire-and-forget from the command's perspective: delivery is the
/// transport's problem, but the sink must preserve the order of calls made
/// from a single command.
pub trait UpdateSink: Send + Sync {
    fn send(&self, update: Update);
}

/// Sink backed by an unbounded channel toward the RPC layer.
///
/// A dropped receiver means the controller is gone; the update is discarded
/// rather than surfaced as an error the command could do nothing about.
impl UpdateSink for tokio::sync::mpsc::UnboundedSender<Update> {
    fn send(&self, update: Update) {
        if let Err(e) = tokio::sync::mpsc::UnboundedSender::send(self, update) {
            tracing::warn!(error = %e, "update sink receiver dropped");
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::UpdateSink;
    use parking_lot::Mutex;
    use pw_core::Update;
    use std::sync::Arc;

    /// Fake sink recording every update for assertions.
    #[derive(Clone, Default)]
    pub struct FakeSink {
        updates: Arc<Mutex<Vec<Update>>>,
    }

    impl FakeSink {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of all updates received so far, in order.
        pub fn updates(&self) -> Vec<Update> {
            self.updates.lock().clone()
        }

        /// The terminal exit code, if one has been sent.
        pub fn rc(&self) -> Option<i32> {
            self.updates.lock().iter().find_map(|u| u.rc())
        }
    }

    impl UpdateSink for FakeSink {
        fn send(&self, update: Update) {
            self.updates.lock().push(update);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSink;

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
