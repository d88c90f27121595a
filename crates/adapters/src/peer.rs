// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote peer servicing a file transfer.
//!
//! The peer lives on the master side of the RPC channel; every call is a
//! round-trip that may be arbitrarily delayed. Transfers must await each
//! call before issuing the next one.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from remote peer round-trips
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("remote call failed: {0}")]
    CallFailed(String),
}

/// The master-side counterpart of a transfer command.
///
/// `close` (or `unpack`, for archive streams) must be called exactly once
/// per transfer regardless of success, failure, or interruption.
#[async_trait]
pub trait RemotePeer: Send + Sync {
    /// Accept one block of uploaded data.
    async fn write(&self, data: &[u8]) -> Result<(), PeerError>;

    /// Return up to `length` bytes; an empty result signals end of stream.
    async fn read(&self, length: usize) -> Result<Vec<u8>, PeerError>;

    /// Signal that an uploaded archive stream is complete and should be
    /// extracted. Replaces `close` for directory uploads.
    async fn unpack(&self) -> Result<(), PeerError>;

    /// Release the remote-side resource.
    async fn close(&self) -> Result<(), PeerError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{PeerError, RemotePeer};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// One recorded peer round-trip.
    ///
    /// `Writes`/`Reads` are the collapsed markers recorded once when
    /// per-call counting is off, so assertions stay stable in tests where
    /// the exact number of calls depends on scheduling.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PeerOp {
        Write(usize),
        Writes,
        Read(usize),
        Reads,
        Unpack,
        Close,
    }

    #[derive(Default)]
    struct FakePeerState {
        ops: Vec<PeerOp>,
        source: Vec<u8>,
        written: Vec<u8>,
        total_written: usize,
        wrote: bool,
        read_any: bool,
    }

    /// Fake remote peer recording every round-trip.
    #[derive(Clone, Default)]
    pub struct FakePeer {
        inner: Arc<Mutex<FakePeerState>>,
        count_writes: bool,
        count_reads: bool,
        keep_written: bool,
        write_delay: Option<Duration>,
        read_delay: Option<Duration>,
        fail_write: Option<String>,
        fail_read: Option<String>,
    }

    impl FakePeer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Bytes served out by `read`, drained front to back.
        pub fn with_source(self, data: impl Into<Vec<u8>>) -> Self {
            self.inner.lock().source = data.into();
            self
        }

        /// Record the byte count of every write instead of a collapsed marker.
        pub fn count_writes(mut self) -> Self {
            self.count_writes = true;
            self
        }

        /// Record the requested length of every read instead of a collapsed marker.
        pub fn count_reads(mut self) -> Self {
            self.count_reads = true;
            self
        }

        /// Capture uploaded bytes for later inspection.
        pub fn keep_written(mut self) -> Self {
            self.keep_written = true;
            self
        }

        /// Delay every write round-trip, simulating a slow master.
        pub fn write_delay(mut self, delay: Duration) -> Self {
            self.write_delay = Some(delay);
            self
        }

        /// Delay every read round-trip.
        pub fn read_delay(mut self, delay: Duration) -> Self {
            self.read_delay = Some(delay);
            self
        }

        /// Fail every write with the given message.
        pub fn fail_writes(mut self, message: impl Into<String>) -> Self {
            self.fail_write = Some(message.into());
            self
        }

        /// Fail every read with the given message.
        pub fn fail_reads(mut self, message: impl Into<String>) -> Self {
            self.fail_read = Some(message.into());
            self
        }

        /// Snapshot of recorded round-trips, in order.
        pub fn ops(&self) -> Vec<PeerOp> {
            self.inner.lock().ops.clone()
        }

        /// All bytes captured by `keep_written`.
        pub fn written(&self) -> Vec<u8> {
            self.inner.lock().written.clone()
        }

        /// Total bytes accepted by `write`, captured or not.
        pub fn bytes_written(&self) -> usize {
            self.inner.lock().total_written
        }

        /// How many times `close` was called.
        pub fn close_count(&self) -> usize {
            self.inner
                .lock()
                .ops
                .iter()
                .filter(|op| **op == PeerOp::Close)
                .count()
        }
    }

    #[async_trait]
    impl RemotePeer for FakePeer {
        async fn write(&self, data: &[u8]) -> Result<(), PeerError> {
            {
                let mut state = self.inner.lock();
                if self.count_writes {
                    state.ops.push(PeerOp::Write(data.len()));
                } else if !state.wrote {
                    state.ops.push(PeerOp::Writes);
                    state.wrote = true;
                }
                state.total_written += data.len();
                if self.keep_written || self.count_writes {
                    state.written.extend_from_slice(data);
                }
            }
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_write {
                Some(message) => Err(PeerError::CallFailed(message.clone())),
                None => Ok(()),
            }
        }

        async fn read(&self, length: usize) -> Result<Vec<u8>, PeerError> {
            let chunk = {
                let mut state = self.inner.lock();
                if self.count_reads {
                    state.ops.push(PeerOp::Read(length));
                } else if !state.read_any {
                    state.ops.push(PeerOp::Reads);
                    state.read_any = true;
                }
                let take = length.min(state.source.len());
                state.source.drain(..take).collect::<Vec<u8>>()
            };
            if let Some(delay) = self.read_delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_read {
                Some(message) => Err(PeerError::CallFailed(message.clone())),
                None => Ok(chunk),
            }
        }

        async fn unpack(&self) -> Result<(), PeerError> {
            self.inner.lock().ops.push(PeerOp::Unpack);
            Ok(())
        }

        async fn close(&self) -> Result<(), PeerError> {
            self.inner.lock().ops.push(PeerOp::Close);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePeer, PeerOp};

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
