// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle specs: settlement and interrupt across command kinds.

use crate::prelude::*;

#[tokio::test(start_paused = true)]
async fn dummy_timeline_is_status_then_settlement() {
    let sink = FakeSink::new();
    let cmd = DummyCommand::new(Arc::new(sink.clone()));
    cmd.run().await.unwrap();
    assert_eq!(
        sink.updates(),
        vec![Update::Stdout("data".to_string()), Update::Rc(0)]
    );
}

#[tokio::test(start_paused = true)]
async fn interrupt_settles_exactly_once() {
    let sink = FakeSink::new();
    let cmd = Arc::new(DummyCommand::new(Arc::new(sink.clone())));
    let task = {
        let cmd = Arc::clone(&cmd);
        tokio::spawn(async move { cmd.run().await })
    };
    tokio::time::sleep(Duration::from_secs(2)).await;
    cmd.interrupt();
    cmd.interrupt();
    task.await.unwrap().unwrap();
    // A late interrupt after settlement changes nothing either.
    cmd.interrupt();

    let rcs: Vec<i32> = sink.updates().iter().filter_map(Update::rc).collect();
    assert_eq!(rcs, vec![1]);
}

#[tokio::test]
async fn wait_resolves_through_the_registry() {
    let flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let registry = WaitRegistry::new();
    {
        let flag = Arc::clone(&flag);
        registry.register("deploy-finished", move || {
            let flag = Arc::clone(&flag);
            async move {
                flag.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        });
    }

    let sink = FakeSink::new();
    let cmd = WaitCommand::new(Arc::new(sink.clone()), "deploy-finished", registry);
    cmd.run().await.unwrap();

    assert!(flag.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(sink.updates(), vec![Update::Rc(0)]);
}

#[tokio::test(start_paused = true)]
async fn pending_wait_interrupts_with_its_own_rc() {
    let registry = WaitRegistry::new();
    registry.register("never", || async {
        std::future::pending::<()>().await;
        Ok(())
    });

    let sink = FakeSink::new();
    let cmd = Arc::new(WaitCommand::new(Arc::new(sink.clone()), "never", registry));
    let task = {
        let cmd = Arc::clone(&cmd);
        tokio::spawn(async move { cmd.run().await })
    };
    tokio::task::yield_now().await;
    cmd.interrupt();
    task.await.unwrap().unwrap();

    assert_eq!(sink.updates(), vec![Update::Rc(2)]);
}
