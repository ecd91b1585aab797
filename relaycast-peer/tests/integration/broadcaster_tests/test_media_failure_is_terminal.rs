use relaycast_peer::StatusEvent;
use std::time::Duration;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::CountingMediaSource;

#[tokio::test]
async fn test_media_failure_is_terminal() {
    init_tracing();

    let rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::failing());

    assert!(
        rig.observer
            .wait_for(|e| matches!(e, StatusEvent::Terminal { .. }), 2000)
            .await
    );
    assert_eq!(
        rig.observer
            .count(|e| matches!(e, StatusEvent::MediaUnavailable(_))),
        1
    );

    // No reconnection is attempted after a media failure.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(rig.transport.attempts() <= 1);
    assert_eq!(
        rig.observer
            .count(|e| matches!(e, StatusEvent::RetryScheduled { .. })),
        0
    );
    let stats = handle.stats().await.expect("coordinator stays up until closed");
    assert_eq!(stats.active_session_count, 0);

    handle.close().await;
}
