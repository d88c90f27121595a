// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command lifecycle and interrupt framework.
//!
//! Every runnable unit composes a [`CommandCore`] holding the shared
//! lifecycle state: the update sink, the one-way `interrupted` flag, and the
//! once-only terminal report. Concrete commands implement [`Command`] on top.

use async_trait::async_trait;
use pw_adapters::UpdateSink;
use pw_core::Update;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a command may surface directly to the caller.
///
/// Everything else — missing files, truncation, interruption, remote
/// failures — settles through update records, never through `Err`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    InvalidCommand(String),
    #[error("executable not found: {0}")]
    ExecutableNotFound(String),
}

/// Shared lifecycle state composed into every command.
pub struct CommandCore {
    sink: Arc<dyn UpdateSink>,
    cancel: CancellationToken,
    interrupted: AtomicBool,
    finished: AtomicBool,
}

impl CommandCore {
    pub fn new(sink: Arc<dyn UpdateSink>) -> Self {
        Self {
            sink,
            cancel: CancellationToken::new(),
            interrupted: AtomicBool::new(false),
            finished: AtomicBool::new(false),
        }
    }

    /// Emit one update record.
    pub fn send(&self, update: Update) {
        self.sink.send(update);
    }

    /// Emit the terminal report: `rc`, then the optional `stderr` detail.
    ///
    /// Only the first call has any effect. An interrupt racing a normal
    /// completion therefore cannot alter an already-decided rc.
    pub fn finish(&self, rc: i32, stderr: Option<String>) {
        if self.finished.swap(true, Ordering::SeqCst) {
            return;
        }
        self.sink.send(Update::Rc(rc));
        if let Some(text) = stderr {
            self.sink.send(Update::Stderr(text));
        }
    }

    /// Request cooperative interruption. Idempotent: the flag moves
    /// false→true once and the cancellation token fires once.
    pub fn interrupt(&self) {
        if !self.interrupted.swap(true, Ordering::SeqCst) {
            self.cancel.cancel();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Resolves once `interrupt` has been called. Select against this at
    /// suspension points; it never forcibly aborts an in-flight await.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Handle to the sink, for components (like the output reporter) that
    /// emit updates on the command's behalf.
    pub fn sink(&self) -> Arc<dyn UpdateSink> {
        Arc::clone(&self.sink)
    }
}

/// A unit of work run by the worker and monitored via status updates.
#[async_trait]
pub trait Command: Send + Sync {
    /// Run the command to completion. Called exactly once.
    ///
    /// Returns `Err` only for setup-class failures (unknown command,
    /// executable not found); all other outcomes settle via the terminal
    /// `rc` update.
    async fn run(&self) -> Result<(), CommandError>;

    /// Request interruption. Valid at any time; idempotent.
    fn interrupt(&self);
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
