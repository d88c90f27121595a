// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-file download: remote peer → worker filesystem.

use super::StreamOutcome;
use crate::command::{Command, CommandCore, CommandError};
use async_trait::async_trait;
use pw_adapters::{RemotePeer, UpdateSink};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Pulls one file from the remote peer in fixed-size blocks.
///
/// Parent directories are created as needed. The peer's `close` is called
/// exactly once on every terminal path, after the local file has been
/// flushed and dropped.
pub struct DownloadFileCommand {
    core: Arc<CommandCore>,
    path: PathBuf,
    peer: Arc<dyn RemotePeer>,
    block_size: usize,
    max_size: Option<u64>,
    mode: Option<u32>,
}

impl DownloadFileCommand {
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
            mode: None,
        }
    }

    /// Unix permission bits to apply to the destination once created.
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    async fn close_peer(&self) {
        if let Err(e) = self.peer.close().await {
            tracing::warn!(error = %e, "remote close failed");
        }
    }

    async fn open_destination(&self) -> std::io::Result<tokio::fs::File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await?;
        #[cfg(unix)]
        if let Some(mode) = self.mode {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(mode))
                .await?;
        }
        Ok(file)
    }

    /// Pull blocks from the peer into `file` until end of stream, the byte
    /// budget, or an interrupt. A block straddling the budget boundary is
    /// written only up to the budget.
    async fn fetch_blocks(&self, file: &mut tokio::fs::File) -> std::io::Result<StreamOutcome> {
        let mut received: u64 = 0;
        loop {
            if self.core.is_interrupted() {
                return Ok(StreamOutcome::Interrupted);
            }
            if let Some(max) = self.max_size {
                if received >= max {
                    return Ok(StreamOutcome::Truncated);
                }
            }
            let block = match self.peer.read(self.block_size).await {
                Ok(block) => block,
                Err(e) => return Ok(StreamOutcome::PeerFailed(e)),
            };
            if block.is_empty() {
                return Ok(StreamOutcome::Completed);
            }
            let mut take = block.len();
            if let Some(max) = self.max_size {
                let remaining = max.saturating_sub(received);
                take = take.min(remaining as usize);
            }
            file.write_all(&block[..take]).await?;
            received += take as u64;
            if take < block.len() {
                return Ok(StreamOutcome::Truncated);
            }
        }
    }
}

#[async_trait]
impl Command for DownloadFileCommand {
    async fn run(&self) -> Result<(), CommandError> {
        let path = self.path.display();

        let mut file = match self.open_destination().await {
            Ok(file) => file,
            Err(_) => {
                self.close_peer().await;
                self.core
                    .finish(1, Some(format!("Cannot open file '{path}' for download")));
                return Ok(());
            }
        };

        let result = self.fetch_blocks(&mut file).await;
        let flushed = file.flush().await;
        drop(file);
        self.close_peer().await;

        let outcome = match result.and_then(|outcome| flushed.map(|()| outcome)) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.core
                    .finish(1, Some(format!("Error writing '{path}': {e}")));
                return Ok(());
            }
        };
        match outcome {
            StreamOutcome::Completed => self.core.finish(0, None),
            StreamOutcome::Truncated => {
                tracing::warn!(path = %path, "download truncated at byte budget");
                self.core.finish(
                    1,
                    Some(format!("Maximum filesize reached, truncating file '{path}'")),
                );
            }
            StreamOutcome::Interrupted => {
                self.core
                    .finish(1, Some(format!("Download of '{path}' interrupted")));
            }
            StreamOutcome::PeerFailed(e) => {
                tracing::warn!(path = %path, error = %e, "download failed on remote side");
                self.core.finish(1, Some(e.to_string()));
            }
        }
        Ok(())
    }

    fn interrupt(&self) {
        self.core.interrupt();
    }
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
