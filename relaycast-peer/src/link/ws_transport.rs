use crate::error::LinkError;
use crate::link::{RelayChannel, RelayFrame, RelayTransport};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

const ABNORMAL_CLOSURE: u16 = 1006;

/// WebSocket relay transport.
#[derive(Debug, Clone, Default)]
pub struct WsTransport;

#[async_trait]
impl RelayTransport for WsTransport {
    async fn connect(&self, url: &str) -> Result<RelayChannel, LinkError> {
        let (socket, _) = connect_async(url).await.map_err(|e| LinkError::Connect {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        debug!("WebSocket connected to {}", url);

        let (mut sender, mut receiver) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel::<RelayFrame>();

        let mut send_task = tokio::spawn(async move {
            while let Some(text) = out_rx.recv().await {
                if sender.send(Message::Text(text.into())).await.is_err() {
                    return;
                }
            }
            let _ = sender.send(Message::Close(None)).await;
        });

        let mut recv_task = tokio::spawn(async move {
            let mut code = Some(ABNORMAL_CLOSURE);
            let mut reason = String::from("connection lost");

            while let Some(msg) = receiver.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        if in_tx.send(RelayFrame::Text(text.as_str().to_owned())).is_err() {
                            return;
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        code = frame.as_ref().map(|f| u16::from(f.code));
                        reason = frame
                            .map(|f| f.reason.as_str().to_owned())
                            .unwrap_or_default();
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("WebSocket error: {}", e);
                        reason = e.to_string();
                        break;
                    }
                }
            }
            let _ = in_tx.send(RelayFrame::Closed { code, reason });
        });

        tokio::spawn(async move {
            tokio::select! {
                _ = (&mut send_task) => recv_task.abort(),
                _ = (&mut recv_task) => send_task.abort(),
            };
        });

        Ok(RelayChannel {
            outgoing: out_tx,
            incoming: in_rx,
        })
    }
}
