// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-file upload: worker filesystem → remote peer.

use super::{stream_blocks, StreamOutcome};
use crate::command::{Command, CommandCore, CommandError};
use async_trait::async_trait;
use pw_adapters::{RemotePeer, UpdateSink};
use pw_core::Update;
use std::path::PathBuf;
use std::sync::Arc;

/// Streams one file to the remote peer in fixed-size blocks.
///
/// The peer's `close` is called exactly once on every terminal path.
pub struct UploadFileCommand {
    core: Arc<CommandCore>,
    path: PathBuf,
    peer: Arc<dyn RemotePeer>,
    block_size: usize,
    max_size: Option<u64>,
}

impl UploadFileCommand {
    pub fn new(
        sink: Arc<dyn UpdateSink>,
        peer: Arc<dyn RemotePeer>,
        path: impl Into<PathBuf>,
        block_size: usize,
        max_size: Option<u64>,
    ) -> Self {
        Self {
            core: Arc::new(CommandCore::new(sink)),
            path: path.into(),
            peer,
            block_size,
            max_size,
        }
    }

    async fn close_peer(&self) {
        if let Err(e) = self.peer.close().await {
            tracing::warn!(error = %e, "remote close failed");
        }
    }
}

#[async_trait]
impl Command for UploadFileCommand {
    async fn run(&self) -> Result<(), CommandError> {
        let path = self.path.display();
        self.core.send(Update::Header(format!("sending {path}")));

        let file = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(_) => {
                self.close_peer().await;
                self.core
                    .finish(1, Some(format!("Cannot open file '{path}' for upload")));
                return Ok(());
            }
        };

        let result = stream_blocks(
            &self.core,
            self.peer.as_ref(),
            file,
            self.block_size,
            self.max_size,
        )
        .await;
        self.close_peer().await;

        match result {
            Ok(StreamOutcome::Completed) => self.core.finish(0, None),
            Ok(StreamOutcome::Truncated) => {
                tracing::warn!(path = %path, "upload truncated at byte budget");
                self.core.finish(
                    1,
                    Some(format!("Maximum filesize reached, truncating file '{path}'")),
                );
            }
            Ok(StreamOutcome::Interrupted) => {
                self.core
                    .finish(1, Some(format!("Upload of '{path}' interrupted")));
            }
            Ok(StreamOutcome::PeerFailed(e)) => {
                tracing::warn!(path = %path, error = %e, "upload failed on remote side");
                self.core.finish(1, Some(e.to_string()));
            }
            Err(e) => {
                self.core
                    .finish(1, Some(format!("Error reading '{path}': {e}")));
            }
        }
        Ok(())
    }

    fn interrupt(&self) {
        self.core.interrupt();
    }
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
