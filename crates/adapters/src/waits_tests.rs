// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn registered_factory_resolves_and_runs() {
    let registry = WaitRegistry::new();
    registry.register("ready", || async { Ok(()) });
    let factory = registry.resolve("ready").unwrap();
    assert!(factory().await.is_ok());
}

#[tokio::test]
async fn factory_failure_propagates() {
    let registry = WaitRegistry::new();
    registry.register("doomed", || async {
        Err(WaitError::Failed("nope".to_string()))
    });
    let factory = registry.resolve("doomed").unwrap();
    let err = factory().await.unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn unknown_name_resolves_to_none() {
    let registry = WaitRegistry::new();
    assert!(registry.resolve("missing").is_none());
}

#[test]
fn unregister_removes_entry() {
    let registry = WaitRegistry::new();
    registry.register("once", || async { Ok(()) });
    registry.unregister("once");
    assert!(registry.resolve("once").is_none());
}

#[test]
fn registration_replaces_previous_entry() {
    let registry = WaitRegistry::new();
    registry.register("name", || async { Ok(()) });
    registry.register("name", || async {
        Err(WaitError::Failed("second".to_string()))
    });
    assert!(registry.resolve("name").is_some());
}

#[test]
fn clones_share_the_same_table() {
    let registry = WaitRegistry::new();
    let other = registry.clone();
    other.register("shared", || async { Ok(()) });
    assert!(registry.resolve("shared").is_some());
}

#[test]
fn concurrent_registration_is_safe() {
    let registry = WaitRegistry::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                registry.register(format!("cb-{i}"), || async { Ok(()) });
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    for i in 0..8 {
        assert!(registry.resolve(&format!("cb-{i}")).is_some());
    }
}
