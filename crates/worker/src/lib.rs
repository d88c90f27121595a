// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pw-worker: Command execution and data-transfer framework.
//!
//! A controller constructs a command with its arguments and an update sink,
//! calls [`Command::run`], and may call [`Command::interrupt`] at any time.
//! The command streams incremental status through the sink and settles with
//! exactly one terminal `rc` update.

pub mod command;
pub mod registry;
pub mod reporter;
pub mod shell;
pub mod synthetic;
pub mod transfer;

pub use command::{Command, CommandCore, CommandError};
pub use registry::{find_executable, CommandKind};
pub use reporter::{BufferedReporter, ReporterConfig};
pub use shell::ShellCommand;
pub use synthetic::{DummyCommand, WaitCommand};
pub use transfer::{Compression, DownloadFileCommand, UploadDirectoryCommand, UploadFileCommand};
