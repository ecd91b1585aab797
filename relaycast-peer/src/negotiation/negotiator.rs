use crate::media::LocalMedia;
use crate::negotiation::NegotiationEvent;
use crate::session::SessionKey;
use anyhow::Result;
use async_trait::async_trait;
use relaycast_core::PathCandidate;
use tokio::sync::mpsc;

/// The per-session object that performs path establishment and carries media.
///
/// Every method is one asynchronous step of the handshake; the session
/// worker calls them strictly one at a time, in request order.
#[async_trait]
pub trait Negotiator: Send + Sync {
    /// Attach the shared local tracks (broadcaster side).
    async fn add_local_media(&self, media: &LocalMedia) -> Result<()>;

    /// Create an offer and store it as the local description.
    async fn create_offer(&self) -> Result<String>;

    /// Apply a remote offer, create the answer and store it locally.
    async fn accept_offer(&self, sdp: String) -> Result<String>;

    /// Apply the remote answer to a previously created offer.
    async fn apply_answer(&self, sdp: String) -> Result<()>;

    async fn add_candidate(&self, candidate: PathCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

/// Builds negotiation objects; `events` receives everything the object
/// raises unprompted, tagged with `key`.
#[async_trait]
pub trait NegotiatorFactory: Send + Sync + 'static {
    async fn create(
        &self,
        key: SessionKey,
        events: mpsc::Sender<NegotiationEvent>,
    ) -> Result<Box<dyn Negotiator>>;
}
