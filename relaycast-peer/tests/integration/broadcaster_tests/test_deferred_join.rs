use serde_json::json;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::CountingMediaSource;

#[tokio::test]
async fn test_join_before_media_is_deferred() {
    init_tracing();

    let mut rig = TestRig::new();
    let (media, gate) = CountingMediaSource::gated();
    let handle = rig.broadcaster(test_config(), media.clone());
    let mut relay = rig.next_connection().await;

    relay.push(json!({"type": "viewer-joined"}));
    assert!(
        relay.next_frame(200).await.is_none(),
        "no offer without local media"
    );

    gate.notify_one();

    let offer = relay.next_of_type("offer").await;
    assert_eq!(offer["viewerId"], 1);
    assert_eq!(media.acquired(), 1);

    handle.close().await;
}
