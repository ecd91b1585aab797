use crate::error::MediaError;
use crate::media::LocalMedia;
use crate::session::{SessionInput, SessionKey};

/// Internal events fed back into a coordinator loop by its own tasks.
#[derive(Debug)]
pub(crate) enum CoordinatorEvent {
    /// A negotiator step finished.
    Completed { key: SessionKey, input: SessionInput },

    /// The retry timer identified by `token` fired.
    RetryDue { token: u64 },

    MediaAcquired(Result<LocalMedia, MediaError>),
}
