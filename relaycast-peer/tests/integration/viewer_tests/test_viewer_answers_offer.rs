use relaycast_core::{PathCandidate, SignalingState, ViewerId};
use relaycast_peer::negotiation::NegotiationEvent;
use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config, wait_until};
use crate::utils::{NegotiatorCall, RecordingSink};

#[tokio::test]
async fn test_viewer_answers_offer() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.viewer(test_config(), RecordingSink::new());
    let mut relay = rig.next_connection().await;

    assert_eq!(relay.url, "ws://relay.test/signal/room-42/viewer");
    assert_eq!(relay.next_json().await, json!({"type": "viewer-joined"}));

    // A candidate racing ahead of the offer is held back.
    relay.push(json!({
        "type": "ice-candidate",
        "candidate": {"candidate": "early"},
        "viewerId": 7
    }));
    relay.push(json!({"type": "offer", "sdp": "o1", "viewerId": 7}));

    let answer = relay.next_of_type("answer").await;
    assert_eq!(
        answer,
        json!({"type": "answer", "sdp": "answer-to-o1", "viewerId": 7})
    );

    let negotiators = rig.negotiators.clone();
    assert!(wait_until(2000, || negotiators.calls_for_generation(1).len() >= 2).await);
    assert_eq!(
        rig.negotiators.calls_for_generation(1),
        vec![
            NegotiatorCall::AcceptOffer("o1".into()),
            NegotiatorCall::AddCandidate("early".into()),
        ]
    );

    // Local candidates carry the bound viewer id.
    let key = rig.negotiators.keys()[0];
    rig.negotiators
        .emit(NegotiationEvent::CandidateGenerated(key, PathCandidate::new("mine")))
        .await;
    let candidate = relay.next_of_type("ice-candidate").await;
    assert_eq!(candidate["viewerId"], 7);
    assert_eq!(candidate["candidate"]["candidate"], "mine");

    let stats = handle.stats().await.unwrap();
    assert_eq!(stats.viewer_id, Some(ViewerId(7)));
    assert_eq!(stats.signaling_state, Some(SignalingState::Stable));
    assert!(!stats.connected);

    handle.close().await;
}

#[tokio::test]
async fn test_viewer_ignores_offers_for_other_viewers() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.viewer(test_config(), RecordingSink::new());
    let mut relay = rig.next_connection().await;
    relay.next_json().await;

    relay.push(json!({"type": "offer", "sdp": "mine", "viewerId": 3}));
    relay.next_of_type("answer").await;

    relay.push(json!({"type": "offer", "sdp": "theirs", "viewerId": 4}));
    assert!(relay.next_frame(200).await.is_none());

    assert_eq!(
        rig.negotiators.calls_for_generation(1),
        vec![NegotiatorCall::AcceptOffer("mine".into())]
    );

    handle.close().await;
}
