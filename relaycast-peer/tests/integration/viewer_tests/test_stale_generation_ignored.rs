use relaycast_core::SignalingState;
use relaycast_peer::StatusEvent;
use relaycast_peer::negotiation::{ConnectionState, NegotiationEvent};
use serde_json::json;
use std::time::Duration;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::RecordingSink;

#[tokio::test]
async fn test_events_from_replaced_session_are_ignored() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.viewer(test_config(), RecordingSink::new());
    let relay = rig.next_connection().await;
    let old_key = rig.negotiators.keys()[0];

    relay.close(1001);
    let mut relay = rig.next_connection().await;
    assert_eq!(relay.next_json().await, json!({"type": "viewer-joined"}));
    assert_eq!(rig.negotiators.keys().len(), 2);

    rig.negotiators
        .emit(NegotiationEvent::StateChanged(old_key, ConnectionState::Failed))
        .await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        rig.observer
            .count(|e| matches!(e, StatusEvent::SessionFailed { .. })),
        0
    );
    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.signaling_state, Some(SignalingState::Stable));

    // The fresh session still negotiates normally.
    relay.push(json!({"type": "offer", "sdp": "o2", "viewerId": 1}));
    let answer = relay.next_of_type("answer").await;
    assert_eq!(answer["sdp"], "answer-to-o2");

    handle.close().await;
}
