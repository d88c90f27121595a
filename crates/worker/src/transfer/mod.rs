// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-transfer commands: move bytes between the worker filesystem and a
//! remote peer under a byte budget and cooperative cancellation.

mod archive;
mod download;
mod upload;

pub use archive::{Compression, UploadDirectoryCommand};
pub use download::DownloadFileCommand;
pub use upload::UploadFileCommand;

use crate::command::CommandCore;
use pw_adapters::{PeerError, RemotePeer};
use tokio::io::{AsyncRead, AsyncReadExt};

/// How a block-streaming loop ended.
pub(crate) enum StreamOutcome {
    /// Source exhausted; every byte was delivered.
    Completed,
    /// The byte budget ran out mid-stream.
    Truncated,
    /// `interrupt()` was observed between blocks.
    Interrupted,
    /// A remote round-trip failed.
    PeerFailed(PeerError),
}

/// Read `reader` in `block_size` blocks and write each to the peer,
/// awaiting every write before reading the next block (at most one
/// outstanding write).
///
/// The budget is checked before each read; a budget that is exactly
/// exhausted reports truncation, which remote peers rely on. An in-flight
/// write is allowed to complete after an interrupt; the loop stops before
/// issuing the next one.
pub(crate) async fn stream_blocks<R: AsyncRead + Unpin>(
    core: &CommandCore,
    peer: &dyn RemotePeer,
    mut reader: R,
    block_size: usize,
    max_size: Option<u64>,
) -> std::io::Result<StreamOutcome> {
    let mut sent: u64 = 0;
    let mut buf = vec![0u8; block_size.max(1)];
    loop {
        if core.is_interrupted() {
            return Ok(StreamOutcome::Interrupted);
        }
        let mut length = buf.len();
        if let Some(max) = max_size {
            let remaining = max.saturating_sub(sent);
            if remaining == 0 {
                return Ok(StreamOutcome::Truncated);
            }
            length = length.min(remaining as usize);
        }
        let n = reader.read(&mut buf[..length]).await?;
        if n == 0 {
            return Ok(StreamOutcome::Completed);
        }
        if let Err(e) = peer.write(&buf[..n]).await {
            return Ok(StreamOutcome::PeerFailed(e));
        }
        sent += n as u64;
    }
}
