// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transfer specs: upload captured by a fake peer, then served back
//! through a download.

use crate::prelude::*;

#[tokio::test]
async fn file_survives_an_upload_download_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.bin");
    let data: Vec<u8> = (0u32..2000).flat_map(|i| i.to_le_bytes()).collect();
    std::fs::write(&source, &data).unwrap();

    let up_sink = FakeSink::new();
    let up_peer = FakePeer::new().keep_written();
    let upload = UploadFileCommand::new(
        Arc::new(up_sink.clone()),
        Arc::new(up_peer.clone()),
        &source,
        256,
        None,
    );
    upload.run().await.unwrap();
    assert_eq!(up_sink.rc(), Some(0));
    assert_eq!(up_peer.close_count(), 1);

    let dest = dir.path().join("restored").join("source.bin");
    let down_sink = FakeSink::new();
    let down_peer = FakePeer::new().with_source(up_peer.written());
    let download = DownloadFileCommand::new(
        Arc::new(down_sink.clone()),
        Arc::new(down_peer.clone()),
        &dest,
        512,
        None,
    );
    download.run().await.unwrap();
    assert_eq!(down_sink.rc(), Some(0));
    assert_eq!(down_peer.close_count(), 1);

    assert_eq!(std::fs::read(&dest).unwrap(), data);
}

#[tokio::test]
async fn directory_upload_produces_an_extractable_archive() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("tree");
    std::fs::create_dir_all(src.join("a").join("b")).unwrap();
    std::fs::write(src.join("root.txt"), "root\n").unwrap();
    std::fs::write(src.join("a").join("b").join("leaf.txt"), "leaf\n").unwrap();

    let sink = FakeSink::new();
    let peer = FakePeer::new().keep_written();
    let upload = UploadDirectoryCommand::new(
        Arc::new(sink.clone()),
        Arc::new(peer.clone()),
        &src,
        4096,
        None,
    )
    .compression(Compression::None);
    upload.run().await.unwrap();

    assert_eq!(sink.rc(), Some(0));
    assert_eq!(peer.ops().last(), Some(&PeerOp::Unpack));
    assert_eq!(peer.close_count(), 0);

    let dest = dir.path().join("extracted");
    tar::Archive::new(std::io::Cursor::new(peer.written()))
        .unpack(&dest)
        .unwrap();
    assert_eq!(std::fs::read_to_string(dest.join("root.txt")).unwrap(), "root\n");
    assert_eq!(
        std::fs::read_to_string(dest.join("a").join("b").join("leaf.txt")).unwrap(),
        "leaf\n"
    );
}

#[tokio::test]
async fn budgeted_round_trip_truncates_on_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("big");
    std::fs::write(&source, vec![1u8; 1000]).unwrap();

    let up_sink = FakeSink::new();
    let up_peer = FakePeer::new().keep_written();
    let upload = UploadFileCommand::new(
        Arc::new(up_sink.clone()),
        Arc::new(up_peer.clone()),
        &source,
        128,
        Some(500),
    );
    upload.run().await.unwrap();
    assert_eq!(up_sink.rc(), Some(1));
    assert!(up_peer.written().len() <= 500);

    let dest = dir.path().join("small");
    let down_sink = FakeSink::new();
    let down_peer = FakePeer::new().with_source(up_peer.written());
    let download = DownloadFileCommand::new(
        Arc::new(down_sink.clone()),
        Arc::new(down_peer.clone()),
        &dest,
        128,
        Some(200),
    );
    download.run().await.unwrap();
    assert_eq!(down_sink.rc(), Some(1));
    assert_eq!(std::fs::read(&dest).unwrap().len(), 200);
}
