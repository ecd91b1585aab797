use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use webrtc::track::track_remote::TrackRemote;

/// Media received from the broadcaster.
#[derive(Clone)]
pub struct RemoteMedia {
    pub stream_id: String,
    pub track_id: String,
    pub kind: String,
    pub track: Option<Arc<TrackRemote>>,
}

impl fmt::Debug for RemoteMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMedia")
            .field("stream_id", &self.stream_id)
            .field("track_id", &self.track_id)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Presentation target for remote media.
pub trait RemoteSink: Send + Sync + 'static {
    /// Attach `media` to the element named `element_id`.
    ///
    /// Returns `false` when no such element exists; that is never an error.
    fn attach(&self, element_id: &str, media: RemoteMedia) -> bool;
}

/// Drains incoming RTP and logs what arrives.
#[derive(Debug, Clone, Default)]
pub struct LoggingSink;

impl RemoteSink for LoggingSink {
    fn attach(&self, element_id: &str, media: RemoteMedia) -> bool {
        info!(
            "Attaching {} track {} to '{}'",
            media.kind, media.track_id, element_id
        );

        let Some(track) = media.track else {
            warn!("Remote media {} carries no track", media.track_id);
            return true;
        };

        let track_id = media.track_id;
        tokio::spawn(async move {
            let mut packets: u64 = 0;
            while track.read_rtp().await.is_ok() {
                packets += 1;
                if packets % 500 == 0 {
                    info!("Track {} received {} packets", track_id, packets);
                }
            }
            info!("Track {} ended after {} packets", track_id, packets);
        });
        true
    }
}
