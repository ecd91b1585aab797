use relaycast_core::ViewerId;
use relaycast_peer::StatusEvent;
use relaycast_peer::negotiation::{ConnectionState, NegotiationEvent};
use serde_json::json;
use std::time::Duration;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::{CountingMediaSource, NegotiatorCall};

#[tokio::test]
async fn test_failed_session_is_removed() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());
    let mut relay = rig.next_connection().await;

    relay.push(json!({"type": "viewer-joined"}));
    relay.push(json!({"type": "viewer-joined"}));
    relay.next_of_type("offer").await;
    relay.next_of_type("offer").await;

    let key = rig.negotiators.key_for(ViewerId(1)).expect("session for viewer 1");
    rig.negotiators
        .emit(NegotiationEvent::StateChanged(key, ConnectionState::Failed))
        .await;

    assert!(
        rig.observer
            .wait_for(
                |e| matches!(e, StatusEvent::SessionFailed { viewer_id: Some(ViewerId(1)), .. }),
                2000
            )
            .await
    );
    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.viewer_ids, vec![ViewerId(2)]);

    // Renegotiating a removed viewer does nothing; a live one offers again.
    handle.renegotiate(ViewerId(1)).await.unwrap();
    handle.renegotiate(ViewerId(2)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        rig.negotiators
            .calls_for_viewer(ViewerId(2))
            .iter()
            .filter(|c| **c == NegotiatorCall::CreateOffer)
            .count(),
        1,
        "viewer 2 is still waiting for an answer, so no second offer"
    );

    handle.close().await;
}
