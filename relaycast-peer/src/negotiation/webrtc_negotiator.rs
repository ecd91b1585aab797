use crate::media::{LocalMedia, RemoteMedia};
use crate::negotiation::{
    ConnectionState, NegotiationConfig, NegotiationEvent, Negotiator, NegotiatorFactory,
};
use crate::session::SessionKey;
use anyhow::{Context, Result};
use async_trait::async_trait;
use relaycast_core::PathCandidate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// A negotiator backed by a `webrtc` peer connection.
pub struct WebRtcNegotiator {
    key: SessionKey,
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcNegotiator {
    /// Build the peer connection and wire its callbacks into `event_tx`.
    pub async fn new(
        key: SessionKey,
        config: &NegotiationConfig,
        event_tx: mpsc::Sender<NegotiationEvent>,
    ) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer Connection State changed for {}: {}", key, s);
                    let Some(state) = map_state(s) else { return };
                    let _ = tx.send(NegotiationEvent::StateChanged(key, state)).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(NegotiationEvent::CandidateGenerated(key, from_init(init)))
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    debug!("Remote track {} arrived for {}", track.id(), key);
                    let media = RemoteMedia {
                        stream_id: track.stream_id(),
                        track_id: track.id(),
                        kind: track.kind().to_string(),
                        track: Some(track),
                    };
                    let _ = tx.send(NegotiationEvent::RemoteTrack(key, media)).await;
                })
            },
        ));

        Ok(Self {
            key,
            peer_connection,
        })
    }
}

#[async_trait]
impl Negotiator for WebRtcNegotiator {
    async fn add_local_media(&self, media: &LocalMedia) -> Result<()> {
        for track in media.tracks() {
            let rtp_sender = self
                .peer_connection
                .add_track(Arc::clone(track))
                .await
                .with_context(|| format!("failed to add track {}", track.id()))?;

            // RTCP has to be read for interceptors to run.
            tokio::spawn(async move {
                let mut rtcp_buf = vec![0u8; 1500];
                while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
            });
        }
        debug!("Attached {} local tracks to {}", media.len(), self.key);
        Ok(())
    }

    async fn create_offer(&self) -> Result<String> {
        let offer = self.peer_connection.create_offer(None).await?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await?;
        Ok(offer.sdp)
    }

    async fn accept_offer(&self, sdp: String) -> Result<String> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;

        let answer = self.peer_connection.create_answer(None).await?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await?;
        Ok(answer.sdp)
    }

    async fn apply_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_candidate(&self, candidate: PathCandidate) -> Result<()> {
        self.peer_connection
            .add_ice_candidate(to_init(candidate))
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Creates a [`WebRtcNegotiator`] per session from one shared configuration.
#[derive(Debug, Clone, Default)]
pub struct WebRtcNegotiatorFactory {
    config: NegotiationConfig,
}

impl WebRtcNegotiatorFactory {
    pub fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NegotiatorFactory for WebRtcNegotiatorFactory {
    async fn create(
        &self,
        key: SessionKey,
        events: mpsc::Sender<NegotiationEvent>,
    ) -> Result<Box<dyn Negotiator>> {
        let negotiator = WebRtcNegotiator::new(key, &self.config, events).await?;
        Ok(Box::new(negotiator))
    }
}

fn map_state(state: RTCPeerConnectionState) -> Option<ConnectionState> {
    match state {
        RTCPeerConnectionState::New => Some(ConnectionState::New),
        RTCPeerConnectionState::Connecting => Some(ConnectionState::Connecting),
        RTCPeerConnectionState::Connected => Some(ConnectionState::Connected),
        RTCPeerConnectionState::Disconnected => Some(ConnectionState::Disconnected),
        RTCPeerConnectionState::Failed => Some(ConnectionState::Failed),
        RTCPeerConnectionState::Closed => Some(ConnectionState::Closed),
        RTCPeerConnectionState::Unspecified => {
            warn!("Ignoring unspecified peer connection state");
            None
        }
    }
}

fn to_init(candidate: PathCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.candidate,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: candidate.sdp_m_line_index,
        username_fragment: candidate.username_fragment,
    }
}

fn from_init(init: RTCIceCandidateInit) -> PathCandidate {
    PathCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}
