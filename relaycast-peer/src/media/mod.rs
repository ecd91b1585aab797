mod local_media;
mod remote_sink;

pub use local_media::{LocalMedia, MediaSource, SharedTrack, StaticMediaSource};
pub use remote_sink::{LoggingSink, RemoteMedia, RemoteSink};
