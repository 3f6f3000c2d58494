//! Messages forwarded to the rendering collaborator.
//!
//! Each [`ViewMessage`] serializes with a `type` tag naming the update:
//!
//! ```json
//! { "type": "frameReceived", "id": 7, "webSocketSerialID": 3, "sent": false, ... }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::error::Result;
use crate::frame::Frame;
use crate::session::Connection;

// ============================================================================
// ViewMessage
// ============================================================================

/// An update for the frame list UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ViewMessage {
    /// A WebSocket was created.
    WebSocketCreated(Connection),

    /// A WebSocket completed its handshake.
    WebSocketOpened(Connection),

    /// A WebSocket closed.
    WebSocketClosed(Connection),

    /// A classified frame was received.
    FrameReceived(Frame),

    /// A classified frame was sent.
    FrameSent(Frame),

    /// The tab navigated; the frame list was reset.
    TabNavigated,

    /// The frame list was cleared on request.
    Cleared,
}

impl ViewMessage {
    /// Returns the frame carried by this message, if any.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            Self::FrameReceived(frame) | Self::FrameSent(frame) => Some(frame),
            _ => None,
        }
    }

    /// Serializes the message for the view.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::frame::{CapturedFrame, FrameData};
    use crate::identifiers::{FrameId, SocketId};

    #[test]
    fn test_frame_message_json() {
        let captured = CapturedFrame::new(SocketId::new(2), false, FrameData::text("o", 1));
        let classification = Classifier::new().classify("o");
        let frame = Frame::new(FrameId::new(5), captured, classification);

        let message = ViewMessage::FrameReceived(frame);
        assert_eq!(message.frame().map(|f| f.id), Some(FrameId::new(5)));

        let value: serde_json::Value =
            serde_json::from_str(&message.to_json().expect("serialize")).expect("json");
        assert_eq!(value["type"], "frameReceived");
        assert_eq!(value["id"], 5);
        assert_eq!(value["sockJs"]["frameType"], "open");
    }

    #[test]
    fn test_unit_message_json() {
        let json = ViewMessage::TabNavigated.to_json().expect("serialize");
        assert_eq!(json, r#"{"type":"tabNavigated"}"#);
        assert!(ViewMessage::Cleared.frame().is_none());
    }
}
