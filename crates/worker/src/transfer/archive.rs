// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory upload: the tree is packed into a tar archive (optionally
//! compressed), spooled to an anonymous temp file, then streamed like a
//! regular upload. The peer's `unpack` replaces `close` as the mandatory
//! terminal call.

use super::{stream_blocks, StreamOutcome};
use crate::command::{Command, CommandCore, CommandError};
use async_trait::async_trait;
use pw_adapters::{RemotePeer, UpdateSink};
use pw_core::Update;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Archive compression applied before streaming.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Bzip2,
}

/// Streams a directory to the remote peer as a (possibly compressed) tar
/// archive.
///
/// The archive is built to completion on a blocking thread before the
/// first block goes out, so a packing failure never leaves the peer with
/// a partial archive.
pub struct UploadDirectoryCommand {
    core: Arc<CommandCore>,
    path: PathBuf,
    peer: Arc<dyn RemotePeer>,
    block_size: usize,
    max_size: Option<u64>,
    compression: Compression,
}

impl UploadDirectoryCommand {
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
            compression: Compression::None,
        }
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    async fn unpack_peer(&self) {
        if let Err(e) = self.peer.unpack().await {
            tracing::warn!(error = %e, "remote unpack failed");
        }
    }

    /// Pack `path` into a rewound anonymous temp file.
    async fn build_archive(&self) -> std::io::Result<tokio::fs::File> {
        let path = self.path.clone();
        let compression = self.compression;
        let file = tokio::task::spawn_blocking(move || pack_directory(&path, compression))
            .await
            .map_err(std::io::Error::other)??;
        Ok(tokio::fs::File::from_std(file))
    }
}

fn pack_directory(path: &Path, compression: Compression) -> std::io::Result<std::fs::File> {
    let spool = tempfile::tempfile()?;
    let mut spool = match compression {
        Compression::None => {
            let mut builder = tar::Builder::new(spool);
            builder.append_dir_all(".", path)?;
            builder.into_inner()?
        }
        Compression::Gzip => {
            let encoder = flate2::write::GzEncoder::new(spool, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            builder.append_dir_all(".", path)?;
            builder.into_inner()?.finish()?
        }
        Compression::Bzip2 => {
            let encoder = bzip2::write::BzEncoder::new(spool, bzip2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            builder.append_dir_all(".", path)?;
            builder.into_inner()?.finish()?
        }
    };
    spool.seek(SeekFrom::Start(0))?;
    Ok(spool)
}

#[async_trait]
impl Command for UploadDirectoryCommand {
    async fn run(&self) -> Result<(), CommandError> {
        let path = self.path.display();
        self.core.send(Update::Header(format!("sending {path}")));

        let archive = match self.build_archive().await {
            Ok(archive) => archive,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "packing directory failed");
                self.unpack_peer().await;
                self.core.finish(
                    1,
                    Some(format!("Cannot archive directory '{path}' for upload")),
                );
                return Ok(());
            }
        };

        let result = stream_blocks(
            &self.core,
            self.peer.as_ref(),
            archive,
            self.block_size,
            self.max_size,
        )
        .await;
        self.unpack_peer().await;

        match result {
            Ok(StreamOutcome::Completed) => self.core.finish(0, None),
            Ok(StreamOutcome::Truncated) => {
                tracing::warn!(path = %path, "directory upload truncated at byte budget");
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
                tracing::warn!(path = %path, error = %e, "directory upload failed on remote side");
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
#[path = "archive_tests.rs"]
mod tests;
