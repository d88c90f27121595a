// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell command specs: real processes, updates delivered over a channel.

#![cfg(unix)]

use crate::prelude::*;

fn drain_channel(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Update>) -> Vec<Update> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

#[tokio::test]
async fn echo_delivers_header_output_and_rc() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sink: Arc<dyn UpdateSink> = Arc::new(tx);

    let argv: Vec<Arg> = vec!["echo".into(), "hello integration".into()];
    let cmd = ShellCommand::new(sink, argv, dir.path());
    cmd.run().await.unwrap();

    let updates = drain_channel(&mut rx);
    assert_eq!(
        updates.first(),
        Some(&Update::Header("executing echo hello integration".to_string()))
    );
    assert_eq!(updates.last(), Some(&Update::Rc(0)));
    let stdout: String = updates
        .iter()
        .filter_map(|u| match u {
            Update::Stdout(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(stdout, "hello integration\n");
}

#[tokio::test]
async fn secret_argument_is_masked_in_the_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sink: Arc<dyn UpdateSink> = Arc::new(tx);

    let argv = vec![
        Arg::plain("echo"),
        Arg::secret("hunter2", "*******"),
    ];
    let cmd = ShellCommand::new(sink, argv, dir.path());
    cmd.run().await.unwrap();

    let updates = drain_channel(&mut rx);
    assert_eq!(
        updates.first(),
        Some(&Update::Header("executing echo *******".to_string()))
    );
    // The process itself sees the real value.
    let stdout: String = updates
        .iter()
        .filter_map(|u| match u {
            Update::Stdout(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(stdout, "hunter2\n");
}

#[tokio::test]
async fn nonzero_exit_is_the_terminal_rc() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let sink: Arc<dyn UpdateSink> = Arc::new(tx);

    let argv: Vec<Arg> = vec!["sh".into(), "-c".into(), "exit 5".into()];
    let cmd = ShellCommand::new(sink, argv, dir.path());
    cmd.run().await.unwrap();

    let updates = drain_channel(&mut rx);
    assert_eq!(updates.last(), Some(&Update::Rc(5)));
}
