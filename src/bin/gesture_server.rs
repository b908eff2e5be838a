//! Gesture server: receives hand landmark frames and fingertip trails over TCP,
//! runs the per-hand pipeline, and forwards commands and progress via OSC.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};

use gesture_pilot::command::shape_command;
use gesture_pilot::config::Config;
use gesture_pilot::osc::CommandClient;
use gesture_pilot::protocol::{self, ClientMessage, HandResult, ServerMessage};
use gesture_pilot::shape::{ShapeRecognizer, TrailRecognizer};
use gesture_pilot::tracker::HandTracker;

#[derive(Parser, Debug)]
#[command(name = "gesture_server", about = "TCP front end for the gesture pipeline")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Overrides server.listen_addr
    #[arg(short, long)]
    listen: Option<String>,
}

/// Per-connection state. Each client gets its own hand slots and trail.
struct Session {
    tracker: HandTracker,
    recognizer: TrailRecognizer,
    osc: Option<Arc<CommandClient>>,
}

impl Session {
    fn new(config: &Config, osc: Option<Arc<CommandClient>>) -> Self {
        Self {
            tracker: HandTracker::from_config(config),
            recognizer: TrailRecognizer::default(),
            osc,
        }
    }

    /// Returns the reply for `msg`, if any.
    fn handle(&mut self, msg: ClientMessage) -> Option<ServerMessage> {
        match msg {
            ClientMessage::HandFrame { timestamp_us, hands } => {
                let reports = self.tracker.process_frame(&hands);
                for report in &reports {
                    if let Some(cmd) = &report.command {
                        info!(
                            "{} {} -> {} ({:.2}){}",
                            report.handedness,
                            cmd.gesture,
                            cmd.text,
                            cmd.confidence,
                            if cmd.critical { " CRITICAL" } else { "" },
                        );
                    }
                    if let Some(osc) = &self.osc {
                        if let Err(e) = osc.send_report(report) {
                            warn!("OSC send failed: {:#}", e);
                        }
                    }
                }
                Some(ServerMessage::FrameResult {
                    timestamp_us,
                    hands: reports.iter().map(HandResult::from).collect(),
                })
            }
            ClientMessage::TrailPoints { points } => {
                self.recognizer.extend(points);
                None
            }
            ClientMessage::TrailEnd => {
                let points = self.recognizer.trail().len();
                let shape = self.recognizer.finish_stroke();
                let text = match shape {
                    Some(s) => {
                        let entry = shape_command(s);
                        info!("shape {} -> {} ({} points)", s, entry.text, points);
                        if let Some(osc) = &self.osc {
                            if let Err(e) = osc.send_shape(s) {
                                warn!("OSC send failed: {:#}", e);
                            }
                        }
                        entry.text.to_string()
                    }
                    None => {
                        debug!("stroke of {} points matched no shape", points);
                        String::new()
                    }
                };
                Some(ServerMessage::ShapeResult { shape, text })
            }
            ClientMessage::Reset => {
                info!("session reset");
                self.tracker.reset();
                self.recognizer.reset();
                None
            }
        }
    }
}

async fn run_session(stream: TcpStream, mut session: Session) -> Result<()> {
    let framed = protocol::message_stream(stream);
    let (mut sink, mut reader) = framed.split();

    protocol::send_to_sink(&mut sink, &ServerMessage::Ready).await?;

    while let Some(result) = reader.next().await {
        let bytes = result?;
        let msg: ClientMessage = match bincode::deserialize(&bytes) {
            Ok(m) => m,
            Err(e) => {
                warn!("dropping undecodable message ({} bytes): {}", bytes.len(), e);
                continue;
            }
        };
        if let Some(reply) = session.handle(msg) {
            protocol::send_to_sink(&mut sink, &reply).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, load_err) = Config::load_or_default(&cli.config);

    let log_path = gesture_pilot::logging::init(&config.log, "gesture_server=info,gesture_pilot=info")?;

    info!("Gesture Server v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = load_err {
        warn!("{:#}; using defaults", e);
    }
    if let Some(path) = &log_path {
        info!("Log: {}", path.display());
    }

    let osc = if config.osc.enabled {
        info!("OSC target: {}", config.osc.addr);
        Some(Arc::new(CommandClient::new(&config.osc.addr)?))
    } else {
        info!("OSC disabled");
        None
    };

    let listen = cli.listen.as_deref().unwrap_or(&config.server.listen_addr);
    let bind_addr: SocketAddr = listen.parse().context("invalid listen_addr")?;
    let listener = TcpListener::bind(bind_addr).await?;
    info!("Listening on {}", bind_addr);

    loop {
        let (tcp_stream, addr) = listener.accept().await?;
        tcp_stream.set_nodelay(true)?;
        info!("Client connected: {}", addr);

        let session = Session::new(&config, osc.clone());
        tokio::spawn(async move {
            match run_session(tcp_stream, session).await {
                Ok(()) => info!("Client disconnected: {}", addr),
                Err(e) => warn!("Client {} error: {:#}", addr, e),
            }
        });
    }
}
