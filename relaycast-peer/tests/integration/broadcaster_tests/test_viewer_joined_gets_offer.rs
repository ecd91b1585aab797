use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::CountingMediaSource;

#[tokio::test]
async fn test_viewer_joined_gets_offer() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());

    let mut relay = rig.next_connection().await;
    assert_eq!(relay.url, "ws://relay.test/signal/room-42/broadcaster");

    relay.push(json!({"type": "viewer-joined"}));

    let offer = relay.next_of_type("offer").await;
    assert_eq!(offer["viewerId"], 1);
    assert_eq!(offer["sdp"], "offer-1");

    let stats = handle.stats().await.expect("coordinator alive");
    assert_eq!(stats.active_session_count, 1);

    handle.close().await;
}
