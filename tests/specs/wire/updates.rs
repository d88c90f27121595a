// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format specs: the update stream a whole command produces, as the
//! remote side would see it.

use crate::prelude::*;

fn to_json_lines(updates: &[Update]) -> Vec<String> {
    updates
        .iter()
        .map(|u| serde_json::to_string(u).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn dummy_stream_serializes_as_tagged_objects() {
    let sink = FakeSink::new();
    let cmd = DummyCommand::new(Arc::new(sink.clone()));
    cmd.run().await.unwrap();

    assert_eq!(
        to_json_lines(&sink.updates()),
        vec![r#"{"stdout":"data"}"#, r#"{"rc":0}"#]
    );
}

#[tokio::test]
async fn failed_upload_stream_carries_rc_before_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nosuch");
    let sink = FakeSink::new();
    let peer = FakePeer::new();

    let cmd = UploadFileCommand::new(
        Arc::new(sink.clone()),
        Arc::new(peer.clone()),
        &path,
        64,
        None,
    );
    cmd.run().await.unwrap();

    let lines = to_json_lines(&sink.updates());
    assert_eq!(lines[0], format!(r#"{{"header":"sending {}"}}"#, path.display()));
    assert_eq!(lines[1], r#"{"rc":1}"#);
    assert_eq!(
        lines[2],
        format!(
            r#"{{"stderr":"Cannot open file '{}' for upload"}}"#,
            path.display()
        )
    );
}
