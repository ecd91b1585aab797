use crate::error::MediaError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use webrtc::track::track_local::TrackLocal;

pub type SharedTrack = Arc<dyn TrackLocal + Send + Sync>;

/// Tracks shared read-only by every broadcaster session.
#[derive(Clone, Default)]
pub struct LocalMedia {
    tracks: Vec<SharedTrack>,
}

impl LocalMedia {
    pub fn new(tracks: Vec<SharedTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[SharedTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl fmt::Debug for LocalMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalMedia")
            .field("tracks", &self.tracks.iter().map(|t| t.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Where the broadcaster's outgoing media comes from.
///
/// The coordinator acquires once per run and releases exactly once on close.
#[async_trait]
pub trait MediaSource: Send + Sync + 'static {
    async fn acquire(&self) -> Result<LocalMedia, MediaError>;

    fn release(&self, media: LocalMedia);
}

/// A source handing out a fixed set of tracks, for hosts that produce
/// samples themselves.
#[derive(Clone, Default)]
pub struct StaticMediaSource {
    tracks: Vec<SharedTrack>,
}

impl StaticMediaSource {
    pub fn new(tracks: Vec<SharedTrack>) -> Self {
        Self { tracks }
    }
}

#[async_trait]
impl MediaSource for StaticMediaSource {
    async fn acquire(&self) -> Result<LocalMedia, MediaError> {
        if self.tracks.is_empty() {
            return Err(MediaError::Unavailable("no tracks configured".to_owned()));
        }
        info!("Local media ready with {} tracks", self.tracks.len());
        Ok(LocalMedia::new(self.tracks.clone()))
    }

    fn release(&self, media: LocalMedia) {
        debug!("Releasing {} local tracks", media.len());
    }
}
