// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status update records sent from a running command to its controller.
//!
//! Wire format: each record is a single-key JSON object, e.g.
//! `{"stdout": "..."}` or `{"rc": 0}`.

use serde::{Deserialize, Serialize};

/// Output stream a text fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamId {
    Stdout,
    Stderr,
}

impl StreamId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamId::Stdout => "stdout",
            StreamId::Stderr => "stderr",
        }
    }
}

/// A single status update record.
///
/// Updates form an ordered, append-only sequence. A command emits zero or
/// more stream/header records followed by exactly one terminal `Rc` record
/// (optionally accompanied by a `Stderr` detail for non-zero codes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Update {
    /// A chunk of process stdout.
    Stdout(String),
    /// A chunk of process stderr, or the error detail for a failed command.
    Stderr(String),
    /// Informational text not tied to either process stream.
    Header(String),
    /// Terminal exit code. Sent exactly once per command.
    Rc(i32),
}

impl Update {
    /// Build a stream chunk record for the given stream.
    pub fn stream(stream: StreamId, text: impl Into<String>) -> Self {
        match stream {
            StreamId::Stdout => Update::Stdout(text.into()),
            StreamId::Stderr => Update::Stderr(text.into()),
        }
    }

    /// The terminal exit code, if this is an `Rc` record.
    pub fn rc(&self) -> Option<i32> {
        match self {
            Update::Rc(code) => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
