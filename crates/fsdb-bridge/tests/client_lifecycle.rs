//! Integration tests for the client lifecycle over the loopback bridge.

use std::time::Duration;

use fsdb_bridge::{
    Client, ClientConfig, Error, LoopbackBridge, SubscriptionKey, SubscriptionKind,
    SubscriptionMode, SubscriptionStatus,
};

fn fast_config(client_id: &str) -> ClientConfig {
    ClientConfig::new(client_id)
        .with_subscribe_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(5))
}

#[tokio::test]
async fn test_demo_flow() {
    let bridge = LoopbackBridge::new().with_latency(Duration::from_millis(20));
    let observer = bridge.clone();

    let mut client = Client::create(bridge, fast_config("fsdb-demo")).unwrap();
    assert_eq!(client.status(), SubscriptionStatus::default());

    client.subscribe_to_state().await.unwrap();
    client.subscribe_to_stats().await.unwrap();

    let status = client.status();
    assert!(status.state);
    assert!(status.stats);
    assert_eq!(status.active_count(), 2);
    assert_eq!(client.client_id(), "fsdb-demo");

    client.close();
    client.close();
    drop(client);

    assert_eq!(observer.created(), 1);
    assert_eq!(observer.destroyed(), 1);
}

#[tokio::test]
async fn test_stats_failure_leaves_state_active() {
    let bridge = LoopbackBridge::new().rejecting(SubscriptionKind::Stats);
    let mut client = Client::create(bridge, fast_config("stats-less")).unwrap();

    client.subscribe_to_state().await.unwrap();
    let err = client.subscribe_to_stats().await.unwrap_err();

    assert!(matches!(
        err,
        Error::Subscription {
            kind: SubscriptionKind::Stats,
            ..
        }
    ));
    assert_eq!(
        client.status(),
        SubscriptionStatus {
            state: true,
            stats: false
        }
    );
}

#[test]
fn test_many_clients_release_independently() {
    let observer = LoopbackBridge::new();
    let mut clients: Vec<_> = (0..4)
        .map(|i| Client::with_client_id(observer.clone(), format!("client-{}", i)).unwrap())
        .collect();
    assert_eq!(observer.live_handles(), 4);

    clients[1].close();
    assert_eq!(observer.live_handles(), 3);
    assert_eq!(clients[0].native_client_id().unwrap().as_deref(), Some("client-0"));

    clients.clear();
    assert_eq!(observer.live_handles(), 0);
    assert_eq!(observer.destroyed(), 4);
}

#[test]
fn test_subscription_keys_follow_host() {
    let client = Client::create(
        LoopbackBridge::new(),
        fast_config("keyed").with_host("fsdb.example"),
    )
    .unwrap();

    let key = client.subscription_key(SubscriptionKind::State);
    assert_eq!(key.to_string(), "fsdb.example:/path:/state:/agent/switchState/portMaps");

    let parsed: SubscriptionKey = key.to_string().parse().unwrap();
    assert_eq!(parsed, key);
    assert_eq!(parsed.mode, SubscriptionMode::Path);
}
