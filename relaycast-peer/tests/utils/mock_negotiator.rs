use anyhow::{Result, bail};
use async_trait::async_trait;
use relaycast_core::{PathCandidate, ViewerId};
use relaycast_peer::media::LocalMedia;
use relaycast_peer::negotiation::{NegotiationEvent, Negotiator, NegotiatorFactory};
use relaycast_peer::session::SessionKey;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NegotiatorCall {
    AddLocalMedia(usize),
    CreateOffer,
    AcceptOffer(String),
    ApplyAnswer(String),
    AddCandidate(String),
    Close,
}

#[derive(Default)]
struct Inner {
    calls: Mutex<Vec<(SessionKey, NegotiatorCall)>>,
    events: Mutex<Vec<(SessionKey, mpsc::Sender<NegotiationEvent>)>>,
    fail_offers: AtomicBool,
}

/// Negotiators that answer instantly with predictable SDP and log every call.
///
/// Offers are `offer-{generation}`; answers are `answer-to-{offer}`.
#[derive(Clone, Default)]
pub struct ScriptedNegotiatorFactory {
    inner: Arc<Inner>,
}

impl ScriptedNegotiatorFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_offers(&self) {
        self.inner.fail_offers.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(SessionKey, NegotiatorCall)> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn calls_for_generation(&self, generation: u64) -> Vec<NegotiatorCall> {
        self.calls()
            .into_iter()
            .filter(|(key, _)| key.generation == generation)
            .map(|(_, call)| call)
            .collect()
    }

    pub fn calls_for_viewer(&self, viewer_id: ViewerId) -> Vec<NegotiatorCall> {
        self.calls()
            .into_iter()
            .filter(|(key, _)| key.viewer_id == Some(viewer_id))
            .map(|(_, call)| call)
            .collect()
    }

    pub fn keys(&self) -> Vec<SessionKey> {
        self.inner
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn key_for(&self, viewer_id: ViewerId) -> Option<SessionKey> {
        self.keys()
            .into_iter()
            .rev()
            .find(|key| key.viewer_id == Some(viewer_id))
    }

    /// Raise an event as if the negotiator for `key` produced it.
    pub async fn emit(&self, event: NegotiationEvent) {
        let key = event.key();
        let sender = self
            .inner
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, tx)| tx.clone())
            .expect("no negotiator for key");
        sender.send(event).await.expect("coordinator is gone");
    }
}

#[async_trait]
impl NegotiatorFactory for ScriptedNegotiatorFactory {
    async fn create(
        &self,
        key: SessionKey,
        events: mpsc::Sender<NegotiationEvent>,
    ) -> Result<Box<dyn Negotiator>> {
        self.inner.events.lock().unwrap().push((key, events));
        Ok(Box::new(ScriptedNegotiator {
            key,
            inner: self.inner.clone(),
        }))
    }
}

struct ScriptedNegotiator {
    key: SessionKey,
    inner: Arc<Inner>,
}

impl ScriptedNegotiator {
    fn record(&self, call: NegotiatorCall) {
        self.inner.calls.lock().unwrap().push((self.key, call));
    }
}

#[async_trait]
impl Negotiator for ScriptedNegotiator {
    async fn add_local_media(&self, media: &LocalMedia) -> Result<()> {
        self.record(NegotiatorCall::AddLocalMedia(media.len()));
        Ok(())
    }

    async fn create_offer(&self) -> Result<String> {
        self.record(NegotiatorCall::CreateOffer);
        if self.inner.fail_offers.load(Ordering::SeqCst) {
            bail!("scripted offer failure");
        }
        Ok(format!("offer-{}", self.key.generation))
    }

    async fn accept_offer(&self, sdp: String) -> Result<String> {
        self.record(NegotiatorCall::AcceptOffer(sdp.clone()));
        Ok(format!("answer-to-{}", sdp))
    }

    async fn apply_answer(&self, sdp: String) -> Result<()> {
        self.record(NegotiatorCall::ApplyAnswer(sdp));
        Ok(())
    }

    async fn add_candidate(&self, candidate: PathCandidate) -> Result<()> {
        self.record(NegotiatorCall::AddCandidate(candidate.candidate));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.record(NegotiatorCall::Close);
        Ok(())
    }
}
