use relaycast_peer::StatusEvent;
use relaycast_peer::media::RemoteMedia;
use relaycast_peer::negotiation::NegotiationEvent;

use crate::integration::{TestRig, init_tracing, test_config, wait_until};
use crate::utils::RecordingSink;

fn remote_media() -> RemoteMedia {
    RemoteMedia {
        stream_id: "cam".into(),
        track_id: "video-0".into(),
        kind: "video".into(),
        track: None,
    }
}

#[tokio::test]
async fn test_remote_track_attached_to_element() {
    init_tracing();

    let mut rig = TestRig::new();
    let sink = RecordingSink::new();
    let handle = rig.viewer(test_config().with_remote_element("player"), sink.clone());
    let _relay = rig.next_connection().await;

    let key = rig.negotiators.keys()[0];
    rig.negotiators
        .emit(NegotiationEvent::RemoteTrack(key, remote_media()))
        .await;

    assert!(wait_until(2000, || !sink.attached().is_empty()).await);
    assert_eq!(sink.attached(), vec![("player".to_owned(), "video-0".to_owned())]);
    assert_eq!(
        rig.observer
            .count(|e| matches!(e, StatusEvent::StreamAttached { element_id } if element_id == "player")),
        1
    );

    handle.close().await;
}

#[tokio::test]
async fn test_missing_element_is_not_an_error() {
    init_tracing();

    let mut rig = TestRig::new();
    let handle = rig.viewer(test_config(), RecordingSink::missing());
    let _relay = rig.next_connection().await;

    let key = rig.negotiators.keys()[0];
    rig.negotiators
        .emit(NegotiationEvent::RemoteTrack(key, remote_media()))
        .await;

    assert!(handle.stats().await.is_ok());
    assert_eq!(
        rig.observer
            .count(|e| matches!(e, StatusEvent::StreamAttached { .. })),
        0
    );

    handle.close().await;
}
