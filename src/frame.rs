//! WebSocket frame data model.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`FrameData`] | Header bits and payload as captured by the browser |
//! | [`CapturedFrame`] | Capture record handed to the monitor |
//! | [`Frame`] | Logged frame, enriched with its [`Classification`] |
//! | [`ConnectionSummary`] | Aggregate over a set of frames |
//!
//! # Wire Format
//!
//! Frames serialize with the key names the browser backend uses:
//!
//! ```json
//! {
//!   "id": 12,
//!   "webSocketSerialID": 3,
//!   "sent": false,
//!   "data": {
//!     "timeStamp": 1700000000000000,
//!     "finBit": true,
//!     "opCode": 1,
//!     "payload": "42[\"chat\",\"hi\"]",
//!     ...
//!   },
//!   "socketIo": { "type": "event", "engineIo": true, "body": ["chat", "hi"] }
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::classifier::Classification;
use crate::error::Error;
use crate::identifiers::{FrameId, SocketId};

// ============================================================================
// OpCode
// ============================================================================

/// WebSocket frame opcode (RFC 6455 section 5.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OpCode {
    /// Continuation of a fragmented message.
    Continuation,
    /// UTF-8 text.
    #[default]
    Text,
    /// Binary data.
    Binary,
    /// Connection close.
    Close,
    /// Ping.
    Ping,
    /// Pong.
    Pong,
}

impl OpCode {
    /// Short label shown next to each frame.
    #[inline]
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Continuation => "CONT",
            Self::Text => "TEXT",
            Self::Binary => "BINARY",
            Self::Close => "CLOSE",
            Self::Ping => "PING",
            Self::Pong => "PONG",
        }
    }

    /// Returns `true` for close, ping and pong.
    #[inline]
    #[must_use]
    pub const fn is_control(&self) -> bool {
        matches!(self, Self::Close | Self::Ping | Self::Pong)
    }
}

impl TryFrom<u8> for OpCode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Continuation),
            1 => Ok(Self::Text),
            2 => Ok(Self::Binary),
            8 => Ok(Self::Close),
            9 => Ok(Self::Ping),
            10 => Ok(Self::Pong),
            other => Err(Error::invalid_event(
                "frame",
                format!("unknown opcode {other}"),
            )),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op_code: OpCode) -> Self {
        match op_code {
            OpCode::Continuation => 0,
            OpCode::Text => 1,
            OpCode::Binary => 2,
            OpCode::Close => 8,
            OpCode::Ping => 9,
            OpCode::Pong => 10,
        }
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Direction of a frame relative to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent by the page.
    Sent,
    /// Received by the page.
    Received,
}

impl Direction {
    /// Maps the backend's `sent` flag.
    #[inline]
    #[must_use]
    pub const fn from_sent(sent: bool) -> Self {
        if sent { Self::Sent } else { Self::Received }
    }
}

// ============================================================================
// FrameData
// ============================================================================

/// Frame header and payload as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameData {
    /// Capture time in microseconds since the Unix epoch.
    pub time_stamp: u64,

    /// Final fragment flag.
    #[serde(default = "default_fin")]
    pub fin_bit: bool,

    /// Reserved bit 1 (permessage-deflate).
    #[serde(default)]
    pub rsv_bit1: bool,

    /// Reserved bit 2.
    #[serde(default)]
    pub rsv_bit2: bool,

    /// Reserved bit 3.
    #[serde(default)]
    pub rsv_bit3: bool,

    /// Opcode.
    #[serde(default)]
    pub op_code: OpCode,

    /// Masking flag.
    #[serde(default)]
    pub mask_bit: bool,

    /// Masking key.
    #[serde(default)]
    pub mask: u32,

    /// Payload text.
    pub payload: String,
}

fn default_fin() -> bool {
    true
}

impl FrameData {
    /// Creates a final, unmasked text frame.
    #[must_use]
    pub fn text(payload: impl Into<String>, time_stamp: u64) -> Self {
        Self {
            time_stamp,
            fin_bit: true,
            rsv_bit1: false,
            rsv_bit2: false,
            rsv_bit3: false,
            op_code: OpCode::Text,
            mask_bit: false,
            mask: 0,
            payload: payload.into(),
        }
    }

    /// Sets the opcode.
    #[inline]
    #[must_use]
    pub fn with_op_code(mut self, op_code: OpCode) -> Self {
        self.op_code = op_code;
        self
    }

    /// Payload size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

// ============================================================================
// CapturedFrame
// ============================================================================

/// A frame as delivered by the capture backend, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// WebSocket the frame belongs to.
    pub socket_id: SocketId,
    /// `true` if the page sent the frame.
    pub sent: bool,
    /// Header and payload.
    pub data: FrameData,
    /// Backend-reported error, if any.
    pub error: Option<String>,
}

impl CapturedFrame {
    /// Creates a captured frame without error.
    #[inline]
    #[must_use]
    pub fn new(socket_id: SocketId, sent: bool, data: FrameData) -> Self {
        Self {
            socket_id,
            sent,
            data,
            error: None,
        }
    }
}

// ============================================================================
// Frame
// ============================================================================

/// A logged frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame id, unique within the session.
    pub id: FrameId,

    /// WebSocket the frame belongs to.
    #[serde(rename = "webSocketSerialID")]
    pub socket_id: SocketId,

    /// `true` if the page sent the frame.
    pub sent: bool,

    /// Header and payload.
    pub data: FrameData,

    /// Backend-reported error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Decode results.
    #[serde(flatten)]
    pub classification: Classification,
}

impl Frame {
    /// Builds a logged frame from a capture record.
    #[must_use]
    pub fn new(id: FrameId, captured: CapturedFrame, classification: Classification) -> Self {
        Self {
            id,
            socket_id: captured.socket_id,
            sent: captured.sent,
            data: captured.data,
            error: captured.error,
            classification,
        }
    }

    /// Direction of the frame.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        Direction::from_sent(self.sent)
    }

    /// Raw payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.data.payload
    }
}

// ============================================================================
// ConnectionSummary
// ============================================================================

/// Aggregate statistics over a sequence of frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSummary {
    /// Number of frames.
    pub frame_count: u64,
    /// Sum of payload sizes in bytes.
    pub total_size: u64,
    /// Timestamp of the first frame.
    pub start_time: Option<u64>,
    /// Timestamp of the last frame.
    pub end_time: Option<u64>,
}

impl ConnectionSummary {
    /// Computes a summary over `frames`.
    #[must_use]
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Self {
        let mut summary = Self::default();
        for frame in frames {
            summary.record(&frame.data);
        }
        summary
    }

    /// Adds one frame to the summary.
    pub fn record(&mut self, data: &FrameData) {
        self.frame_count += 1;
        self.total_size += data.size() as u64;
        let time_stamp = data.time_stamp;
        self.start_time = Some(self.start_time.map_or(time_stamp, |t| t.min(time_stamp)));
        self.end_time = Some(self.end_time.map_or(time_stamp, |t| t.max(time_stamp)));
    }

    /// Elapsed time between first and last frame, in microseconds.
    #[inline]
    #[must_use]
    pub fn duration_micros(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
