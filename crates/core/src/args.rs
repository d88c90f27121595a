// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command arguments with optional obfuscation of sensitive values.
//!
//! A secret argument pairs the real value used for execution with a masked
//! form used anywhere the argument is displayed or logged. Neither `Display`
//! nor `Debug` ever reveal the real value.

use std::fmt;

/// A single command argument, possibly carrying a hidden real value.
#[derive(Clone, PartialEq, Eq)]
pub enum Arg {
    /// An ordinary argument; displayed as-is.
    Plain(String),
    /// A sensitive argument: `real` is passed to the target, `masked` is
    /// shown everywhere else.
    Secret { real: String, masked: String },
}

impl Arg {
    pub fn plain(value: impl Into<String>) -> Self {
        Arg::Plain(value.into())
    }

    pub fn secret(real: impl Into<String>, masked: impl Into<String>) -> Self {
        Arg::Secret { real: real.into(), masked: masked.into() }
    }

    /// The value to hand to the target being executed.
    pub fn real(&self) -> &str {
        match self {
            Arg::Plain(value) => value,
            Arg::Secret { real, .. } => real,
        }
    }

    /// The value safe to display or log.
    pub fn fake(&self) -> &str {
        match self {
            Arg::Plain(value) => value,
            Arg::Secret { masked, .. } => masked,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fake())
    }
}

// Debug shows the quoted masked form so a secret cannot leak through
// format!("{:?}") in logs.
impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.fake())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Plain(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Plain(value)
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Plain(value.to_string())
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Plain(value.to_string())
    }
}

/// Project an argument list to the values used for execution.
///
/// Preserves length and position; plain entries pass through unchanged.
pub fn resolve_real(args: &[Arg]) -> Vec<String> {
    args.iter().map(|a| a.real().to_string()).collect()
}

/// Project an argument list to the values safe for display.
pub fn resolve_fake(args: &[Arg]) -> Vec<String> {
    args.iter().map(|a| a.fake().to_string()).collect()
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
