use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::CountingMediaSource;
use relaycast_core::ViewerId;
use relaycast_peer::StatusEvent;

#[tokio::test]
async fn test_viewer_ids_increase_across_reconnects() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());
    let mut relay = rig.next_connection().await;

    for _ in 0..3 {
        relay.push(json!({"type": "viewer-joined"}));
    }
    let mut offered = Vec::new();
    for _ in 0..3 {
        let offer = relay.next_of_type("offer").await;
        offered.push(offer["viewerId"].as_u64().expect("numeric viewer id"));
    }
    for id in 1..=3 {
        assert!(offered.contains(&id), "no offer for viewer {}", id);
    }

    // Allocation follows join order.
    let joined: Vec<u64> = rig
        .observer
        .events()
        .iter()
        .filter_map(|e| match e {
            StatusEvent::ViewerJoined { viewer_id } => Some(viewer_id.value()),
            _ => None,
        })
        .collect();
    assert_eq!(joined, vec![1, 2, 3]);

    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.viewer_ids, vec![ViewerId(1), ViewerId(2), ViewerId(3)]);

    // Relay loss tears every session down and reconnects.
    relay.close(1006);
    let mut relay = rig.next_connection().await;
    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.active_session_count, 0);

    relay.push(json!({"type": "viewer-joined"}));
    let offer = relay.next_of_type("offer").await;
    assert_eq!(offer["viewerId"], 4, "ids are never reused");

    handle.close().await;
}
