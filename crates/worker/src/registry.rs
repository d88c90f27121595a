// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command name registry and executable lookup.

use crate::command::CommandError;
use std::path::{Path, PathBuf};

/// The commands this worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Shell,
    UploadFile,
    UploadDirectory,
    DownloadFile,
    Dummy,
    Wait,
}

impl CommandKind {
    /// Resolve a command name sent by the controller.
    pub fn from_name(name: &str) -> Result<Self, CommandError> {
        match name {
            "shell" => Ok(CommandKind::Shell),
            "upload_file" => Ok(CommandKind::UploadFile),
            "upload_directory" => Ok(CommandKind::UploadDirectory),
            "download_file" => Ok(CommandKind::DownloadFile),
            "dummy" => Ok(CommandKind::Dummy),
            "wait" => Ok(CommandKind::Wait),
            other => Err(CommandError::InvalidCommand(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Shell => "shell",
            CommandKind::UploadFile => "upload_file",
            CommandKind::UploadDirectory => "upload_directory",
            CommandKind::DownloadFile => "download_file",
            CommandKind::Dummy => "dummy",
            CommandKind::Wait => "wait",
        }
    }
}

/// Locate the executable for `name`.
///
/// Names containing a path separator are checked directly; bare names are
/// searched on `PATH`. Failure here is a hard error to the caller, not an
/// update record.
pub fn find_executable(name: &str) -> Result<PathBuf, CommandError> {
    let direct = Path::new(name);
    if direct.components().count() > 1 {
        if is_executable(direct) {
            return Ok(direct.to_path_buf());
        }
        return Err(CommandError::ExecutableNotFound(name.to_string()));
    }

    if let Some(path_var) = std::env::var_os("PATH") {
        for dir in std::env::split_paths(&path_var) {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }
    Err(CommandError::ExecutableNotFound(name.to_string()))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
