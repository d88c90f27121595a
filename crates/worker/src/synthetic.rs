// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic commands: timed and callback-driven work without a process.
//!
//! These exercise the full lifecycle and interrupt contract, which makes
//! them useful both for framework tests and as orchestration primitives.

use crate::command::{Command, CommandCore, CommandError};
use async_trait::async_trait;
use pw_adapters::{UpdateSink, WaitRegistry};
use pw_core::Update;
use std::sync::Arc;
use std::time::Duration;

const DUMMY_STATUS_DELAY: Duration = Duration::from_secs(1);
const DUMMY_FINISH_DELAY: Duration = Duration::from_secs(5);

/// Simulates a long-running operation: one stdout update after a fixed
/// delay, a terminal rc 0 after a second delay, rc 1 when interrupted
/// before settling.
pub struct DummyCommand {
    core: Arc<CommandCore>,
}

impl DummyCommand {
    pub fn new(sink: Arc<dyn UpdateSink>) -> Self {
        Self { core: Arc::new(CommandCore::new(sink)) }
    }

    pub fn interrupted(&self) -> bool {
        self.core.is_interrupted()
    }
}

#[async_trait]
impl Command for DummyCommand {
    async fn run(&self) -> Result<(), CommandError> {
        tokio::select! {
            _ = tokio::time::sleep(DUMMY_STATUS_DELAY) => {
                self.core.send(Update::Stdout("data".to_string()));
            }
            _ = self.core.cancelled() => {
                // Interrupted before the status fired; the pending stdout
                // update is suppressed.
                self.core.finish(1, None);
                return Ok(());
            }
        }
        tokio::select! {
            _ = tokio::time::sleep(DUMMY_FINISH_DELAY) => self.core.finish(0, None),
            _ = self.core.cancelled() => self.core.finish(1, None),
        }
        Ok(())
    }

    fn interrupt(&self) {
        self.core.interrupt();
    }
}

/// Awaits a named callback resolved through the injected [`WaitRegistry`].
///
/// rc 0 on success, rc 1 on failure (or an unregistered handle), rc 2 when
/// interrupted while the callback's future is still pending.
pub struct WaitCommand {
    core: Arc<CommandCore>,
    handle: String,
    registry: WaitRegistry,
}

impl WaitCommand {
    pub fn new(sink: Arc<dyn UpdateSink>, handle: impl Into<String>, registry: WaitRegistry) -> Self {
        Self {
            core: Arc::new(CommandCore::new(sink)),
            handle: handle.into(),
            registry,
        }
    }

    pub fn interrupted(&self) -> bool {
        self.core.is_interrupted()
    }
}

#[async_trait]
impl Command for WaitCommand {
    async fn run(&self) -> Result<(), CommandError> {
        let Some(factory) = self.registry.resolve(&self.handle) else {
            self.core.finish(
                1,
                Some(format!("no wait callback registered for '{}'", self.handle)),
            );
            return Ok(());
        };

        tokio::select! {
            result = factory() => match result {
                Ok(()) => self.core.finish(0, None),
                Err(e) => {
                    tracing::warn!(handle = %self.handle, error = %e, "wait callback failed");
                    self.core.finish(1, None);
                }
            },
            _ = self.core.cancelled() => self.core.finish(2, None),
        }
        Ok(())
    }

    fn interrupt(&self) {
        self.core.interrupt();
    }
}

#[cfg(test)]
#[path = "synthetic_tests.rs"]
mod tests;
