use relaycast_core::{ViewerId, WireFormat};
use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config, wait_until};
use crate::utils::{CountingMediaSource, NegotiatorCall};

#[tokio::test]
async fn test_legacy_broadcaster_offers_to_implicit_viewer() {
    init_tracing();

    let mut rig = TestRig::new();
    let config = test_config().with_wire_format(WireFormat::Legacy);
    let handle = rig.broadcaster(config, CountingMediaSource::new());
    let mut relay = rig.next_connection().await;

    assert_eq!(relay.url, "ws://relay.test/signal/room-42");
    assert_eq!(relay.next_frame(2000).await.as_deref(), Some("broadcaster"));

    let offer = relay.next_of_type("offer").await;
    assert_eq!(offer, json!({"type": "offer", "sdp": "offer-1"}));

    relay.push(json!({"candidate": {"candidate": "early"}}));
    relay.push(json!({"type": "answer", "sdp": "legacy-answer"}));

    let negotiators = rig.negotiators.clone();
    assert!(
        wait_until(2000, || negotiators.calls_for_viewer(ViewerId(1)).len() >= 4).await
    );
    assert_eq!(
        rig.negotiators.calls_for_viewer(ViewerId(1))[2..],
        [
            NegotiatorCall::ApplyAnswer("legacy-answer".into()),
            NegotiatorCall::AddCandidate("early".into()),
        ]
    );

    handle.close().await;
}
