use serde_json::{Value, json};

use crate::integration::{WsClient, init_tracing, start_relay, wait_for_connections};

#[tokio::test]
async fn test_offer_reaches_the_viewer_that_joined() {
    init_tracing();
    let (addr, service) = start_relay().await;

    let mut broadcaster = WsClient::connect(addr, "/signal/room-42/broadcaster").await;
    let mut first = WsClient::connect(addr, "/signal/room-42/viewer").await;
    let mut second = WsClient::connect(addr, "/signal/room-42/viewer").await;
    wait_for_connections(&service, 3).await;

    first.send(r#"{"type":"viewer-joined"}"#).await;
    assert_eq!(
        broadcaster.recv(2000).await.as_deref(),
        Some(r#"{"type":"viewer-joined"}"#)
    );

    broadcaster
        .send(&json!({"type": "offer", "sdp": "s1", "viewerId": 1}).to_string())
        .await;
    let offer: Value = serde_json::from_str(&first.recv(2000).await.unwrap()).unwrap();
    assert_eq!(offer["viewerId"], 1);
    assert!(second.recv(200).await.is_none(), "offer went to the wrong viewer");

    first
        .send(&json!({"type": "answer", "sdp": "a1", "viewerId": 1}).to_string())
        .await;
    let answer: Value = serde_json::from_str(&broadcaster.recv(2000).await.unwrap()).unwrap();
    assert_eq!(answer["sdp"], "a1");

    second.close().await;
    first.close().await;
    broadcaster.close().await;
}

#[tokio::test]
async fn test_waiting_viewer_is_replayed_to_late_broadcaster() {
    init_tracing();
    let (addr, service) = start_relay().await;

    let mut viewer = WsClient::connect(addr, "/signal/late/viewer").await;
    wait_for_connections(&service, 1).await;
    viewer.send(r#"{"type":"viewer-joined"}"#).await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let mut broadcaster = WsClient::connect(addr, "/signal/late/broadcaster").await;
    assert_eq!(
        broadcaster.recv(2000).await.as_deref(),
        Some(r#"{"type":"viewer-joined"}"#)
    );

    broadcaster
        .send(&json!({"type": "offer", "sdp": "s", "viewerId": 1}).to_string())
        .await;
    assert!(viewer.recv(2000).await.is_some());
}

#[tokio::test]
async fn test_streams_are_isolated() {
    init_tracing();
    let (addr, service) = start_relay().await;

    let mut broadcaster_a = WsClient::connect(addr, "/signal/a/broadcaster").await;
    let mut broadcaster_b = WsClient::connect(addr, "/signal/b/broadcaster").await;
    let mut viewer = WsClient::connect(addr, "/signal/a/viewer").await;
    wait_for_connections(&service, 3).await;

    viewer.send(r#"{"type":"viewer-joined"}"#).await;
    assert!(broadcaster_a.recv(2000).await.is_some());
    assert!(broadcaster_b.recv(200).await.is_none());
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    init_tracing();
    let (addr, _service) = start_relay().await;

    let result =
        tokio_tungstenite::connect_async(format!("ws://{}/signal/room-42/spectator", addr)).await;
    assert!(result.is_err());
}
