//! SockJS frame decoder.
//!
//! SockJS prefixes every frame with one letter:
//!
//! | Prefix | Frame | Body |
//! |--------|-------|------|
//! | `o` | open | none |
//! | `h` | heartbeat | none |
//! | `a` | message batch | JSON array of strings |
//! | `m` | single message | JSON string, or raw text |
//! | `c` | close | JSON `[code, reason]` |
//!
//! Each string inside an `a` batch is itself decoded as JSON when
//! possible. An `m` body that is not JSON is kept as raw text.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use super::{DecodeResult, Decoder, Miss, Protocol};

// ============================================================================
// SockJsFrame
// ============================================================================

/// A decoded SockJS frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "frameType", rename_all = "camelCase")]
pub enum SockJsFrame {
    /// Session opened.
    Open,

    /// Keep-alive.
    Heartbeat,

    /// One (`m`) or more (`a`) application messages.
    Message {
        /// Decoded messages in arrival order.
        payload: Vec<Value>,
    },

    /// Session closed by the server.
    Close {
        /// Close code.
        code: u64,
        /// Close reason.
        reason: String,
    },
}

impl SockJsFrame {
    /// Returns the messages carried by this frame (empty for control frames).
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[Value] {
        match self {
            Self::Message { payload } => payload,
            _ => &[],
        }
    }

    /// Returns `true` for open, heartbeat and close frames.
    #[inline]
    #[must_use]
    pub const fn is_control(&self) -> bool {
        !matches!(self, Self::Message { .. })
    }
}

// ============================================================================
// SockJsDecoder
// ============================================================================

/// Decoder for SockJS framing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SockJsDecoder;

impl SockJsDecoder {
    /// Decodes a single SockJS frame.
    ///
    /// # Errors
    ///
    /// Returns a [`Miss`] for an unknown prefix, trailing data after `o` or
    /// `h`, or a `c`/`a` body that is not valid JSON of the right shape.
    pub fn parse(payload: &str) -> Result<SockJsFrame, Miss> {
        let mut chars = payload.chars();
        let prefix = chars.next().ok_or(Miss::Empty)?;
        let body = chars.as_str();

        match prefix {
            'o' => control_frame(body, SockJsFrame::Open),
            'h' => control_frame(body, SockJsFrame::Heartbeat),
            'a' => {
                let Value::Array(items) =
                    serde_json::from_str::<Value>(body).map_err(Miss::not_json)?
                else {
                    return Err(Miss::malformed(
                        Protocol::SockJs,
                        "message batch is not an array",
                    ));
                };
                let payload = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(text) => Ok(nested_message(text)),
                        _ => Err(Miss::malformed(
                            Protocol::SockJs,
                            "message batch holds a non-string",
                        )),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SockJsFrame::Message { payload })
            }
            'm' => {
                let message = serde_json::from_str::<Value>(body)
                    .unwrap_or_else(|_| Value::String(body.to_string()));
                Ok(SockJsFrame::Message {
                    payload: vec![message],
                })
            }
            'c' => {
                let value: Value = serde_json::from_str(body).map_err(Miss::not_json)?;
                match value.as_array().map(Vec::as_slice) {
                    Some([code, reason]) => match (code.as_u64(), reason.as_str()) {
                        (Some(code), Some(reason)) => Ok(SockJsFrame::Close {
                            code,
                            reason: reason.to_string(),
                        }),
                        _ => Err(Miss::malformed(
                            Protocol::SockJs,
                            "close frame is not [code, reason]",
                        )),
                    },
                    _ => Err(Miss::malformed(
                        Protocol::SockJs,
                        "close frame is not [code, reason]",
                    )),
                }
            }
            other => Err(Miss::unknown_type(Protocol::SockJs, other.to_string())),
        }
    }
}

impl Decoder for SockJsDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::SockJs
    }

    fn decode(&self, payload: &str) -> Result<DecodeResult, Miss> {
        Self::parse(payload).map(DecodeResult::SockJs)
    }
}

/// Open and heartbeat frames are a single letter.
#[inline]
fn control_frame(body: &str, frame: SockJsFrame) -> Result<SockJsFrame, Miss> {
    if body.is_empty() {
        Ok(frame)
    } else {
        Err(Miss::malformed(
            Protocol::SockJs,
            "control frame with trailing data",
        ))
    }
}

/// Batched messages are usually JSON themselves.
#[inline]
fn nested_message(text: String) -> Value {
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

// ============================================================================
// Tests
// ============================================================================
