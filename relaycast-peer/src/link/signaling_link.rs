use crate::link::{RelayFrame, RelayTransport};
use relaycast_core::{Role, SignalMessage, StreamId, WireFormat};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Opened,
    Message(SignalMessage),
    Closed { code: Option<u16>, reason: String },
    Failed(String),
}

/// A link event tagged with the connection attempt that produced it.
#[derive(Debug)]
pub struct LinkEnvelope {
    pub epoch: u64,
    pub event: LinkEvent,
}

/// The duplex message channel to the relay for one role on one stream.
///
/// Each `open` starts a new epoch; events from earlier epochs are
/// discarded by [`SignalingLink::accept`], so a socket that was replaced
/// can never be mistaken for the current one.
pub struct SignalingLink {
    role: Role,
    stream_id: StreamId,
    format: WireFormat,
    url: String,
    state: LinkState,
    epoch: u64,
    outgoing: Option<mpsc::UnboundedSender<String>>,
    task: Option<JoinHandle<()>>,
}

impl SignalingLink {
    pub fn new(role: Role, stream_id: StreamId, format: WireFormat, relay_url: &str) -> Self {
        let url = format!(
            "{}{}",
            relay_url.trim_end_matches('/'),
            format.signal_path(&stream_id, role)
        );
        Self {
            role,
            stream_id,
            format,
            url,
            state: LinkState::Idle,
            epoch: 0,
            outgoing: None,
            task: None,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    /// Start connecting. Returns the new epoch.
    ///
    /// Calling this while a connection is in flight or open is a no-op.
    pub fn open(
        &mut self,
        transport: Arc<dyn RelayTransport>,
        events: mpsc::UnboundedSender<LinkEnvelope>,
    ) -> u64 {
        if matches!(self.state, LinkState::Connecting | LinkState::Open) {
            debug!("[{}] {} link already active", self.stream_id, self.role);
            return self.epoch;
        }

        self.epoch += 1;
        self.state = LinkState::Connecting;

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        self.outgoing = Some(out_tx);

        info!("[{}] {} connecting to {}", self.stream_id, self.role, self.url);
        self.task = Some(tokio::spawn(run_link(
            transport,
            self.url.clone(),
            self.greeting(),
            self.format,
            self.epoch,
            out_rx,
            events,
        )));
        self.epoch
    }

    /// Filter an incoming envelope against the current epoch and track state.
    pub fn accept(&mut self, envelope: LinkEnvelope) -> Option<LinkEvent> {
        if envelope.epoch != self.epoch || self.state == LinkState::Closed {
            debug!(
                "[{}] dropping stale link event from epoch {}",
                self.stream_id, envelope.epoch
            );
            return None;
        }

        match &envelope.event {
            LinkEvent::Opened => self.state = LinkState::Open,
            LinkEvent::Closed { .. } | LinkEvent::Failed(_) => {
                self.state = LinkState::Closed;
                self.outgoing = None;
                self.task = None;
            }
            LinkEvent::Message(_) => {}
        }
        Some(envelope.event)
    }

    /// Serialize and send `msg`. Dropped with a warning unless the link is open.
    pub fn send(&self, msg: &SignalMessage) -> bool {
        if self.state != LinkState::Open {
            warn!(
                "[{}] {} link not open, dropping {}",
                self.stream_id,
                self.role,
                msg.kind()
            );
            return false;
        }

        let text = match self.format.encode(msg) {
            Ok(text) => text,
            Err(e) => {
                warn!("[{}] cannot encode {}: {}", self.stream_id, msg.kind(), e);
                return false;
            }
        };

        match &self.outgoing {
            Some(tx) => tx.send(text).is_ok(),
            None => false,
        }
    }

    /// Close the link. Idempotent; returns whether anything was open.
    pub fn close(&mut self) -> bool {
        if matches!(self.state, LinkState::Idle | LinkState::Closed) && self.outgoing.is_none() {
            return false;
        }

        let was_connecting = self.state == LinkState::Connecting;
        self.state = LinkState::Closed;
        self.epoch += 1;
        self.outgoing = None;

        if let Some(task) = self.task.take() {
            if was_connecting {
                task.abort();
            }
        }
        debug!("[{}] {} link closed", self.stream_id, self.role);
        true
    }

    fn greeting(&self) -> Option<String> {
        match (self.format, self.role) {
            (WireFormat::Legacy, role) => Some(role.as_str().to_owned()),
            (WireFormat::Multiplexed, Role::Viewer) => {
                self.format.encode(&SignalMessage::ViewerJoined {}).ok()
            }
            (WireFormat::Multiplexed, Role::Broadcaster) => None,
        }
    }
}

impl Drop for SignalingLink {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_link(
    transport: Arc<dyn RelayTransport>,
    url: String,
    greeting: Option<String>,
    format: WireFormat,
    epoch: u64,
    mut out_rx: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<LinkEnvelope>,
) {
    let emit = |event: LinkEvent| events.send(LinkEnvelope { epoch, event }).is_ok();

    let mut channel = match transport.connect(&url).await {
        Ok(channel) => channel,
        Err(e) => {
            warn!("{}", e);
            emit(LinkEvent::Failed(e.to_string()));
            return;
        }
    };

    if let Some(text) = greeting {
        let _ = channel.outgoing.send(text);
    }
    if !emit(LinkEvent::Opened) {
        return;
    }

    loop {
        tokio::select! {
            out = out_rx.recv() => match out {
                Some(text) => {
                    if channel.outgoing.send(text).is_err() {
                        debug!("Relay writer for {} is gone", url);
                    }
                }
                // Closed locally; dropping the channel closes the socket.
                None => return,
            },
            frame = channel.incoming.recv() => match frame {
                Some(RelayFrame::Text(text)) => match format.decode(&text) {
                    Ok(msg) => {
                        if !emit(LinkEvent::Message(msg)) {
                            return;
                        }
                    }
                    Err(e) => warn!("Invalid signal message from {}: {} ({})", url, e, text),
                },
                Some(RelayFrame::Closed { code, reason }) => {
                    emit(LinkEvent::Closed { code, reason });
                    return;
                }
                None => {
                    emit(LinkEvent::Closed {
                        code: None,
                        reason: "relay channel dropped".to_owned(),
                    });
                    return;
                }
            },
        }
    }
}
