use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use relaycast_core::{Role, StreamId, WireFormat};
use relaycast_peer::media::{LoggingSink, SharedTrack, StaticMediaSource};
use relaycast_peer::negotiation::NegotiationConfig;
use relaycast_peer::{
    Capabilities, CoordinatorConfig, StatusEvent, StatusObserver, spawn_broadcaster,
    spawn_viewer,
};
use relaycast_relay::RelayConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webrtc::api::media_engine::MIME_TYPE_VP8;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Parser)]
#[command(name = "relaycast")]
#[command(about = "Signaling relay and headless peers for one-to-many WebRTC streams")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind: SocketAddr,
    },
    /// Join a stream as a viewer and log incoming media.
    Watch {
        #[arg(long, default_value = "ws://127.0.0.1:8000")]
        relay: String,

        #[arg(long)]
        stream: String,

        /// Use the single-viewer endpoint.
        #[arg(long)]
        legacy: bool,
    },
    /// Publish an empty VP8 track, useful for checking signaling and connectivity.
    Broadcast {
        #[arg(long, default_value = "ws://127.0.0.1:8000")]
        relay: String,

        #[arg(long)]
        stream: String,

        #[arg(long)]
        legacy: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Relay { bind } => {
            println!("{} {}", "📡 Relay listening on".green().bold(), bind);
            relaycast_relay::run(RelayConfig { bind }).await?;
        }
        Commands::Watch {
            relay,
            stream,
            legacy,
        } => {
            let handle = spawn_viewer(
                coordinator_config(relay, stream, legacy),
                capabilities(),
                Arc::new(LoggingSink),
            );
            wait_for_ctrl_c().await?;
            handle.close().await;
        }
        Commands::Broadcast {
            relay,
            stream,
            legacy,
        } => {
            let track: SharedTrack = Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    ..Default::default()
                },
                "video".to_owned(),
                stream.clone(),
            ));
            let handle = spawn_broadcaster(
                coordinator_config(relay, stream, legacy),
                capabilities(),
                Arc::new(StaticMediaSource::new(vec![track])),
            );
            wait_for_ctrl_c().await?;
            handle.close().await;
        }
    }

    Ok(())
}

fn coordinator_config(relay: String, stream: String, legacy: bool) -> CoordinatorConfig {
    let format = if legacy {
        WireFormat::Legacy
    } else {
        WireFormat::Multiplexed
    };
    CoordinatorConfig::new(relay, stream).with_wire_format(format)
}

fn capabilities() -> Capabilities {
    Capabilities::webrtc(NegotiationConfig::default()).with_observer(Arc::new(ConsoleObserver))
}

async fn wait_for_ctrl_c() -> Result<()> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    println!("{}", "Shutting down...".yellow());
    Ok(())
}

/// Prints status events to stdout.
struct ConsoleObserver;

impl StatusObserver for ConsoleObserver {
    fn on_status(&self, stream_id: &StreamId, role: Role, event: &StatusEvent) {
        let label = format!("[{} {}]", stream_id, role).dimmed();
        let name = if event.is_error() {
            event.name().red().bold()
        } else {
            match event {
                StatusEvent::RelayOpened | StatusEvent::StreamAttached { .. } => {
                    event.name().green().bold()
                }
                StatusEvent::CandidateSent { .. } => return,
                _ => event.name().cyan(),
            }
        };
        println!("{} {} {:?}", label, name, event);
    }
}
