//! TCP protocol for landmark client ↔ gesture server communication.

use bytes::Bytes;
use futures::{Sink, SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

use crate::command::{Color, Command};
use crate::gesture::{GestureLabel, ShapeLabel};
use crate::hand::{HandObservation, Handedness};
use crate::shape::TrailPoint;
use crate::tracker::HandReport;

/// 1フレームあたり数KBなので1MBで十分
pub const MAX_FRAME_LENGTH: usize = 1024 * 1024;

// --- Message types ---

/// Client → Server
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientMessage {
    HandFrame {
        timestamp_us: u64,
        hands: Vec<HandObservation>,
    },
    TrailPoints { points: Vec<TrailPoint> },
    TrailEnd,
    Reset,
}

/// Server → Client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Ready,
    FrameResult {
        timestamp_us: u64,
        hands: Vec<HandResult>,
    },
    /// `shape` is None when the stroke matched nothing
    ShapeResult {
        shape: Option<ShapeLabel>,
        text: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HandResult {
    pub handedness: Handedness,
    pub raw_gesture: GestureLabel,
    pub raw_confidence: f32,
    pub gesture: GestureLabel,
    pub confidence: f32,
    pub frames: usize,
    pub required: usize,
    pub command: Option<CommandPayload>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandPayload {
    pub gesture: GestureLabel,
    pub text: String,
    pub color: Color,
    pub critical: bool,
}

impl From<&Command> for CommandPayload {
    fn from(cmd: &Command) -> Self {
        Self {
            gesture: cmd.gesture,
            text: cmd.text.to_string(),
            color: cmd.color,
            critical: cmd.critical,
        }
    }
}

impl From<&HandReport> for HandResult {
    fn from(report: &HandReport) -> Self {
        Self {
            handedness: report.handedness,
            raw_gesture: report.raw.gesture,
            raw_confidence: report.raw.confidence,
            gesture: report.smoothed.gesture,
            confidence: report.smoothed.confidence,
            frames: report.progress.frames,
            required: report.progress.required,
            command: report.command.as_ref().map(CommandPayload::from),
        }
    }
}

// --- TCP codec helpers ---

pub type MessageStream = Framed<TcpStream, LengthDelimitedCodec>;

/// Create a framed message stream with length-delimited framing.
pub fn message_stream(stream: TcpStream) -> MessageStream {
    let codec = LengthDelimitedCodec::builder()
        .max_frame_length(MAX_FRAME_LENGTH)
        .new_codec();
    Framed::new(stream, codec)
}

/// Send a serializable message (bincode + length prefix).
pub async fn send_message<T: Serialize>(
    stream: &mut MessageStream,
    msg: &T,
) -> anyhow::Result<()> {
    let data = bincode::serialize(msg)?;
    stream.send(Bytes::from(data)).await?;
    Ok(())
}

/// Same as [`send_message`] but for the write half of a split stream.
pub async fn send_to_sink<S, T>(sink: &mut S, msg: &T) -> anyhow::Result<()>
where
    S: Sink<Bytes, Error = std::io::Error> + Unpin,
    T: Serialize,
{
    let data = bincode::serialize(msg)?;
    sink.send(Bytes::from(data)).await?;
    Ok(())
}

/// Receive and deserialize a message.
pub async fn recv_message<T: DeserializeOwned>(
    stream: &mut MessageStream,
) -> anyhow::Result<T> {
    match stream.next().await {
        Some(Ok(bytes)) => Ok(bincode::deserialize(&bytes)?),
        Some(Err(e)) => Err(e.into()),
        None => Err(anyhow::anyhow!("connection closed")),
    }
}
