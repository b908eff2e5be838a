use anyhow::Result;
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::net::UdpSocket;

use crate::command::{shape_command, Command};
use crate::gesture::{GestureLabel, ShapeLabel};
use crate::hand::Handedness;
use crate::tracker::{HandReport, Progress};

/// ドローン制御ブリッジのデフォルトアドレス
pub const OSC_DEFAULT_ADDR: &str = "127.0.0.1:9000";

pub const COMMAND_ADDR: &str = "/gesture/command";
pub const PROGRESS_ADDR: &str = "/gesture/progress";
pub const SHAPE_ADDR: &str = "/gesture/shape";

/// 確定コマンドのOSCメッセージ
/// 引数: gesture, text, b, g, r, critical
pub fn build_command_message(command: &Command) -> OscMessage {
    OscMessage {
        addr: COMMAND_ADDR.to_string(),
        args: vec![
            OscType::String(command.gesture.as_str().to_string()),
            OscType::String(command.text.to_string()),
            OscType::Int(command.color.b as i32),
            OscType::Int(command.color.g as i32),
            OscType::Int(command.color.r as i32),
            OscType::Bool(command.critical),
        ],
    }
}

/// 未確定ジェスチャーの進捗
/// 引数: handedness, gesture, frames, required
pub fn build_progress_message(
    handedness: Handedness,
    gesture: GestureLabel,
    progress: Progress,
) -> OscMessage {
    OscMessage {
        addr: PROGRESS_ADDR.to_string(),
        args: vec![
            OscType::String(handedness.as_str().to_string()),
            OscType::String(gesture.as_str().to_string()),
            OscType::Int(progress.frames as i32),
            OscType::Int(progress.required as i32),
        ],
    }
}

/// 引数: shape, text
pub fn build_shape_message(shape: ShapeLabel) -> OscMessage {
    OscMessage {
        addr: SHAPE_ADDR.to_string(),
        args: vec![
            OscType::String(shape.as_str().to_string()),
            OscType::String(shape_command(shape).text.to_string()),
        ],
    }
}

/// OSCメッセージをバイト列にエンコード
pub fn encode_osc_message(msg: OscMessage) -> Result<Vec<u8>> {
    let encoded = encoder::encode(&OscPacket::Message(msg))?;
    Ok(encoded)
}

/// コマンド送信クライアント
pub struct CommandClient {
    socket: UdpSocket,
    target_addr: String,
}

impl CommandClient {
    pub fn new(target_addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            target_addr: target_addr.to_string(),
        })
    }

    pub fn send_command(&self, command: &Command) -> Result<()> {
        self.send(build_command_message(command))
    }

    pub fn send_progress(
        &self,
        handedness: Handedness,
        gesture: GestureLabel,
        progress: Progress,
    ) -> Result<()> {
        self.send(build_progress_message(handedness, gesture, progress))
    }

    /// 1手分のフレーム結果を送信
    ///
    /// A validated command goes to `/gesture/command`; otherwise a non-unknown
    /// smoothed gesture goes to `/gesture/progress`. Unknown sends nothing.
    pub fn send_report(&self, report: &HandReport) -> Result<()> {
        if let Some(cmd) = &report.command {
            self.send_command(cmd)
        } else if !report.smoothed.is_unknown() {
            self.send_progress(report.handedness, report.smoothed.gesture, report.progress)
        } else {
            Ok(())
        }
    }

    pub fn send_shape(&self, shape: ShapeLabel) -> Result<()> {
        self.send(build_shape_message(shape))
    }

    fn send(&self, msg: OscMessage) -> Result<()> {
        let data = encode_osc_message(msg)?;
        self.socket.send_to(&data, &self.target_addr)?;
        Ok(())
    }
}
