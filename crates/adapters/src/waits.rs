// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of named wait callbacks.
//!
//! A wait command blocks on a future produced by a registered factory. The
//! registry is shared, injected state rather than a process-wide global, so
//! independent commands can register and resolve concurrently.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a wait callback's future
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("wait failed: {0}")]
    Failed(String),
}

/// Future returned by a wait factory.
pub type WaitFuture = Pin<Box<dyn Future<Output = Result<(), WaitError>> + Send>>;

/// Factory producing a fresh wait future per invocation.
pub type WaitFactory = Arc<dyn Fn() -> WaitFuture + Send + Sync>;

/// Concurrency-safe name → factory mapping.
#[derive(Clone, Default)]
pub struct WaitRegistry {
    inner: Arc<Mutex<HashMap<String, WaitFactory>>>,
}

impl WaitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`, replacing any previous entry.
    pub fn register<F, Fut>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), WaitError>> + Send + 'static,
    {
        let factory: WaitFactory = Arc::new(move || Box::pin(factory()));
        self.inner.lock().insert(name.into(), factory);
    }

    /// Look up the factory registered under `name`.
    pub fn resolve(&self, name: &str) -> Option<WaitFactory> {
        self.inner.lock().get(name).cloned()
    }

    /// Remove the entry for `name`, if any.
    pub fn unregister(&self, name: &str) {
        self.inner.lock().remove(name);
    }
}

#[cfg(test)]
#[path = "waits_tests.rs"]
mod tests;
