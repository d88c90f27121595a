// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared imports for the integration specs.

pub use pw_adapters::{FakePeer, FakeSink, PeerOp, UpdateSink, WaitRegistry};
pub use pw_core::{Arg, Update};
pub use pw_worker::{
    Command, Compression, DownloadFileCommand, DummyCommand, ShellCommand, UploadDirectoryCommand,
    UploadFileCommand, WaitCommand,
};
pub use std::sync::Arc;
pub use std::time::Duration;
