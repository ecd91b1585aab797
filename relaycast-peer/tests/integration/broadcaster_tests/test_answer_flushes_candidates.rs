use relaycast_core::ViewerId;
use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config, wait_until};
use crate::utils::{CountingMediaSource, NegotiatorCall};

#[tokio::test]
async fn test_answer_flushes_candidates() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());
    let mut relay = rig.next_connection().await;

    relay.push(json!({"type": "viewer-joined"}));
    relay.next_of_type("offer").await;

    // Candidates racing ahead of the answer must wait for it.
    for c in ["c1", "c2"] {
        relay.push(json!({
            "type": "ice-candidate",
            "candidate": {"candidate": c, "sdpMid": "0", "sdpMLineIndex": 0},
            "viewerId": 1
        }));
    }
    relay.push(json!({"type": "answer", "sdp": "a1", "viewerId": 1}));

    let negotiators = rig.negotiators.clone();
    assert!(
        wait_until(2000, || negotiators.calls_for_viewer(ViewerId(1)).len() >= 5).await,
        "expected queued candidates to be applied"
    );
    assert_eq!(
        rig.negotiators.calls_for_viewer(ViewerId(1)),
        vec![
            NegotiatorCall::AddLocalMedia(0),
            NegotiatorCall::CreateOffer,
            NegotiatorCall::ApplyAnswer("a1".into()),
            NegotiatorCall::AddCandidate("c1".into()),
            NegotiatorCall::AddCandidate("c2".into()),
        ]
    );

    // A duplicate answer in stable state is ignored.
    relay.push(json!({"type": "answer", "sdp": "a2", "viewerId": 1}));
    relay.push(json!({
        "type": "ice-candidate",
        "candidate": {"candidate": "c3"},
        "viewerId": 1
    }));
    assert!(
        wait_until(2000, || negotiators.calls_for_viewer(ViewerId(1)).len() >= 6).await
    );
    assert_eq!(
        rig.negotiators.calls_for_viewer(ViewerId(1))[5],
        NegotiatorCall::AddCandidate("c3".into())
    );

    handle.close().await;
}

#[tokio::test]
async fn test_answer_for_unknown_viewer_is_ignored() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());
    let mut relay = rig.next_connection().await;

    relay.push(json!({"type": "viewer-joined"}));
    relay.next_of_type("offer").await;

    relay.push(json!({"type": "answer", "sdp": "stray", "viewerId": 99}));
    relay.push(json!({"type": "answer", "sdp": "anonymous"}));
    relay.push_text("not even json");
    relay.push(json!({"type": "answer", "sdp": "a1", "viewerId": 1}));

    let negotiators = rig.negotiators.clone();
    assert!(
        wait_until(2000, || negotiators
            .calls_for_viewer(ViewerId(1))
            .contains(&NegotiatorCall::ApplyAnswer("a1".into())))
        .await
    );
    let answers: Vec<_> = rig
        .negotiators
        .calls()
        .into_iter()
        .filter(|(_, call)| matches!(call, NegotiatorCall::ApplyAnswer(_)))
        .collect();
    assert_eq!(answers.len(), 1);

    handle.close().await;
}
