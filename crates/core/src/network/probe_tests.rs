// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use tokio::net::TcpListener;

fn probe(address: String) -> TcpProbe {
    TcpProbe::new(address, Duration::from_secs(2), Duration::from_millis(50))
}

#[tokio::test]
async fn reachable_address_is_online() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    assert!(probe(address).probe().await.unwrap());
}

#[tokio::test]
async fn refused_connection_is_offline() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    assert!(!probe(address).probe().await.unwrap());
}

#[tokio::test]
async fn watch_reports_periodically() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let mut rx = probe(address).watch().unwrap();
    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert_eq!(first, Some(true));
}

#[test]
fn watch_without_runtime_is_unavailable() {
    let err = probe("127.0.0.1:9".to_string()).watch().unwrap_err();
    assert!(matches!(err, NetworkError::Unavailable(_)));
}
