// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output buffering and chunking.
//!
//! Raw process output arrives in many small fragments. The reporter
//! coalesces fragments per stream into as few update records as possible
//! while bounding both record size and staleness:
//!
//! - switching streams flushes the previous stream's buffer first, so
//!   interleaving across stdout/stderr is preserved exactly;
//! - a buffer reaching the size ceiling is flushed immediately;
//! - a background timer flushes whatever is buffered so slow output is
//!   never withheld indefinitely.

use parking_lot::Mutex;
use pw_adapters::UpdateSink;
use pw_core::{StreamId, Update};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Buffering policy knobs.
#[derive(Debug, Clone, Copy)]
pub struct ReporterConfig {
    /// Maximum bytes per emitted update; larger buffers are split at this
    /// boundary, oldest bytes first.
    pub chunk_limit: usize,
    /// Buffered length that triggers an immediate flush on `add`.
    pub buffer_limit: usize,
    /// Staleness bound: the background timer flushes at this interval.
    pub flush_interval: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            chunk_limit: 128 * 1024,
            buffer_limit: 64 * 1024,
            flush_interval: Duration::from_secs(5),
        }
    }
}

struct Inner {
    sink: Arc<dyn UpdateSink>,
    // Current stream and its pending text. Sends happen under this lock so
    // cross-stream ordering is exact.
    buffer: Mutex<Option<(StreamId, String)>>,
    chunk_limit: usize,
    buffer_limit: usize,
    flusher: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.flusher.lock().take() {
            handle.abort();
        }
    }
}

impl Inner {
    fn add(&self, stream: StreamId, fragment: &str) {
        let mut buffer = self.buffer.lock();
        match buffer.as_mut() {
            Some((current, pending)) if *current == stream => pending.push_str(fragment),
            Some(_) => {
                // Stream switch: the previous stream's buffer goes out first.
                self.flush_locked(&mut buffer);
                *buffer = Some((stream, fragment.to_string()));
            }
            None => *buffer = Some((stream, fragment.to_string())),
        }
        let oversized = buffer
            .as_ref()
            .is_some_and(|(_, pending)| pending.len() >= self.buffer_limit);
        if oversized {
            self.flush_locked(&mut buffer);
        }
    }

    fn flush(&self) {
        let mut buffer = self.buffer.lock();
        self.flush_locked(&mut buffer);
    }

    fn flush_locked(&self, buffer: &mut Option<(StreamId, String)>) {
        let Some((stream, pending)) = buffer.take() else {
            return;
        };
        if pending.is_empty() {
            return;
        }
        let mut rest = pending.as_str();
        while !rest.is_empty() {
            let mut end = rest.len().min(self.chunk_limit);
            // Never split inside a multi-byte character.
            while end < rest.len() && !rest.is_char_boundary(end) {
                end += 1;
            }
            let (head, tail) = rest.split_at(end);
            self.sink.send(Update::stream(stream, head));
            rest = tail;
        }
    }
}

/// Cloneable handle to a shared output buffer.
#[derive(Clone)]
pub struct BufferedReporter {
    inner: Arc<Inner>,
}

impl BufferedReporter {
    pub fn new(sink: Arc<dyn UpdateSink>, config: ReporterConfig) -> Self {
        let inner = Arc::new(Inner {
            sink,
            buffer: Mutex::new(None),
            chunk_limit: config.chunk_limit.max(1),
            buffer_limit: config.buffer_limit.max(1),
            flusher: Mutex::new(None),
        });

        // The staleness timer holds only a weak handle so dropping the last
        // reporter stops the task instead of leaking it.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let weak = Arc::downgrade(&inner);
            let interval = config.flush_interval;
            let task = handle.spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let Some(inner) = weak.upgrade() else { break };
                    inner.flush();
                }
            });
            *inner.flusher.lock() = Some(task);
        }

        Self { inner }
    }

    /// Append a fragment to `stream`'s buffer, flushing as the policy
    /// requires.
    pub fn add(&self, stream: StreamId, fragment: &str) {
        self.inner.add(stream, fragment);
    }

    /// Emit everything currently buffered. No-op when empty.
    pub fn flush(&self) {
        self.inner.flush();
    }
}

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;
