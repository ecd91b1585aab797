use relaycast_core::ViewerId;
use relaycast_peer::negotiation::{ConnectionState, NegotiationEvent};
use relaycast_peer::StatusEvent;
use serde_json::json;
use std::time::Duration;

use crate::integration::{TestRig, init_tracing, test_config};
use crate::utils::CountingMediaSource;

fn retries(events: &[StatusEvent]) -> Vec<(u32, Duration)> {
    events
        .iter()
        .filter_map(|e| match e {
            StatusEvent::RetryScheduled { attempt, delay } => Some((*attempt, *delay)),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_flapping_relay_exhausts_retries() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());

    // The relay accepts every connection and drops it straight away.
    for _ in 0..4 {
        let relay = rig.next_connection().await;
        relay.close(1006);
    }

    assert!(
        rig.observer
            .wait_for(|e| matches!(e, StatusEvent::Terminal { .. }), 5000)
            .await
    );
    assert_eq!(
        retries(&rig.observer.events()),
        vec![
            (1, Duration::from_millis(20)),
            (2, Duration::from_millis(40)),
            (3, Duration::from_millis(60)),
        ]
    );

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(rig.transport.attempts(), 4);

    handle.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_connected_viewer_resets_retry_count() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.broadcaster(test_config(), CountingMediaSource::new());

    let relay = rig.next_connection().await;
    relay.close(1006);
    let mut relay = rig.next_connection().await;

    relay.push(json!({"type": "viewer-joined"}));
    relay.next_of_type("offer").await;

    let key = rig.negotiators.key_for(ViewerId(1)).expect("session for viewer 1");
    rig.negotiators
        .emit(NegotiationEvent::StateChanged(key, ConnectionState::Connected))
        .await;
    assert!(
        rig.observer
            .wait_for(
                |e| matches!(
                    e,
                    StatusEvent::ConnectionChanged {
                        state: ConnectionState::Connected,
                        ..
                    }
                ),
                1000
            )
            .await
    );

    relay.close(1006);
    let _relay = rig.next_connection().await;
    assert_eq!(
        retries(&rig.observer.events()),
        vec![
            (1, Duration::from_millis(20)),
            (1, Duration::from_millis(20)),
        ]
    );

    handle.close().await;
}
