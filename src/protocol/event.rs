//! Backend event message types.
//!
//! Events are notifications the browser backend sends whenever a page's
//! WebSocket changes state or transfers a frame.
//!
//! # Event Types
//!
//! | Type | Fields |
//! |------|--------|
//! | `webSocketCreated` | `webSocketSerialID`, `uri`, `protocols` |
//! | `webSocketOpened` | `webSocketSerialID`, `effectiveURI`, `protocols`, `extensions` |
//! | `webSocketClosed` | `webSocketSerialID`, `wasClean`, `code`, `reason` |
//! | `webSocketMessageAvailable` | `webSocketSerialID`, `data`, `messageType` |
//! | `frameReceived`, `frameSent` | `webSocketSerialID`, `data`, optional `error` |
//! | `tabNavigated` | none |

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::frame::{CapturedFrame, FrameData};
use crate::identifiers::SocketId;
use crate::session::CloseInfo;

// ============================================================================
// Event
// ============================================================================

/// A raw event notification from the backend.
///
/// # Format
///
/// ```json
/// {
///   "type": "frameReceived",
///   "webSocketSerialID": 3,
///   "data": { "timeStamp": 1700000000000000, "opCode": 1, "payload": "o" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event name.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Remaining event fields.
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl Event {
    /// Parses an event from backend JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is not an event object.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses the event into a typed variant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEvent`] if a known event lacks its socket
    /// id or frame data.
    pub fn parse(&self) -> Result<BackendEvent> {
        self.parse_internal()
    }
}

// ============================================================================
// BackendEvent
// ============================================================================

/// Parsed backend events.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// WebSocket object created by the page.
    WebSocketCreated {
        /// Serial id.
        socket_id: SocketId,
        /// Requested URI.
        uri: String,
        /// Requested sub-protocols.
        protocols: String,
    },

    /// Handshake completed.
    WebSocketOpened {
        /// Serial id.
        socket_id: SocketId,
        /// URI after redirects.
        effective_uri: String,
        /// Negotiated sub-protocol.
        protocols: String,
        /// Negotiated extensions.
        extensions: String,
    },

    /// Connection closed.
    WebSocketClosed {
        /// Serial id.
        socket_id: SocketId,
        /// Close details.
        close: CloseInfo,
    },

    /// Complete message delivered to the page.
    WebSocketMessageAvailable {
        /// Serial id.
        socket_id: SocketId,
        /// Message data.
        data: String,
        /// Message type reported by the browser.
        message_type: u16,
    },

    /// Frame received by the page.
    FrameReceived(CapturedFrame),

    /// Frame sent by the page.
    FrameSent(CapturedFrame),

    /// Inspected tab navigated to a new document.
    TabNavigated,

    /// Unknown event type.
    Unknown {
        /// Event name.
        event_type: String,
        /// Event fields.
        params: Value,
    },
}

impl BackendEvent {
    /// Returns the socket the event refers to, if any.
    #[must_use]
    pub fn socket_id(&self) -> Option<SocketId> {
        match self {
            Self::WebSocketCreated { socket_id, .. }
            | Self::WebSocketOpened { socket_id, .. }
            | Self::WebSocketClosed { socket_id, .. }
            | Self::WebSocketMessageAvailable { socket_id, .. } => Some(*socket_id),
            Self::FrameReceived(frame) | Self::FrameSent(frame) => Some(frame.socket_id),
            Self::TabNavigated | Self::Unknown { .. } => None,
        }
    }

    /// Returns the captured frame of a frame event.
    #[inline]
    #[must_use]
    pub fn frame(&self) -> Option<&CapturedFrame> {
        match self {
            Self::FrameReceived(frame) | Self::FrameSent(frame) => Some(frame),
            _ => None,
        }
    }
}

// ============================================================================
// Event Parsing Implementation
// ============================================================================

impl Event {
    /// Internal parsing implementation.
    fn parse_internal(&self) -> Result<BackendEvent> {
        let event = match self.event_type.as_str() {
            "webSocketCreated" => BackendEvent::WebSocketCreated {
                socket_id: self.socket_id()?,
                uri: self.get_string("uri"),
                protocols: self.get_string("protocols"),
            },

            "webSocketOpened" => BackendEvent::WebSocketOpened {
                socket_id: self.socket_id()?,
                effective_uri: self.get_string("effectiveURI"),
                protocols: self.get_string("protocols"),
                extensions: self.get_string("extensions"),
            },

            "webSocketClosed" => BackendEvent::WebSocketClosed {
                socket_id: self.socket_id()?,
                close: CloseInfo {
                    was_clean: self.get_bool("wasClean"),
                    code: self.get_u16("code"),
                    reason: self.get_string("reason"),
                },
            },

            "webSocketMessageAvailable" => BackendEvent::WebSocketMessageAvailable {
                socket_id: self.socket_id()?,
                data: self.get_string("data"),
                message_type: self.get_u16("messageType"),
            },

            "frameReceived" => BackendEvent::FrameReceived(self.captured_frame(false)?),

            "frameSent" => BackendEvent::FrameSent(self.captured_frame(true)?),

            "tabNavigated" => BackendEvent::TabNavigated,

            _ => BackendEvent::Unknown {
                event_type: self.event_type.clone(),
                params: Value::Object(self.params.clone()),
            },
        };

        Ok(event)
    }

    /// Reads the required `webSocketSerialID`.
    fn socket_id(&self) -> Result<SocketId> {
        self.params
            .get("webSocketSerialID")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .map(SocketId::new)
            .ok_or_else(|| Error::invalid_event(&self.event_type, "missing webSocketSerialID"))
    }

    /// Reads a frame event's capture record.
    fn captured_frame(&self, sent: bool) -> Result<CapturedFrame> {
        let socket_id = self.socket_id()?;
        let data = self
            .params
            .get("data")
            .ok_or_else(|| Error::invalid_event(&self.event_type, "missing frame data"))?;
        let data = FrameData::deserialize(data)
            .map_err(|e| Error::invalid_event(&self.event_type, e.to_string()))?;

        Ok(CapturedFrame {
            socket_id,
            sent,
            data,
            error: self.get_optional_string("error"),
        })
    }

    /// Gets a string from params.
    #[inline]
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Gets an optional string from params.
    #[inline]
    fn get_optional_string(&self, key: &str) -> Option<String> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Gets a u16 from params. Values outside the `u16` range read as zero.
    #[inline]
    fn get_u16(&self, key: &str) -> u16 {
        self.params
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or_default()
    }

    /// Gets a bool from params.
    #[inline]
    fn get_bool(&self, key: &str) -> bool {
        self.params
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::OpCode;

    #[test]
    fn test_frame_received_parsing() {
        let json_str = r#"{
            "type": "frameReceived",
            "webSocketSerialID": 3,
            "data": {
                "timeStamp": 1700000000000000,
                "finBit": true,
                "opCode": 1,
                "payload": "o"
            }
        }"#;

        let event = Event::from_json(json_str).expect("parse event");
        match event.parse().expect("typed event") {
            BackendEvent::FrameReceived(frame) => {
                assert_eq!(frame.socket_id, SocketId::new(3));
                assert!(!frame.sent);
                assert_eq!(frame.data.op_code, OpCode::Text);
                assert_eq!(frame.data.payload, "o");
                assert!(frame.error.is_none());
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_frame_sent_is_marked_sent() {
        let json_str = r#"{
            "type": "frameSent",
            "webSocketSerialID": 1,
            "data": { "timeStamp": 1, "payload": "hi" },
            "error": "truncated"
        }"#;

        let event = Event::from_json(json_str).expect("parse event");
        match event.parse().expect("typed event") {
            BackendEvent::FrameSent(frame) => {
                assert!(frame.sent);
                assert_eq!(frame.error.as_deref(), Some("truncated"));
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_web_socket_closed_parsing() {
        let json_str = r#"{
            "type": "webSocketClosed",
            "webSocketSerialID": 2,
            "wasClean": true,
            "code": 1000,
            "reason": "done"
        }"#;

        let event = Event::from_json(json_str).expect("parse event");
        let parsed = event.parse().expect("typed event");
        assert_eq!(
            parsed,
            BackendEvent::WebSocketClosed {
                socket_id: SocketId::new(2),
                close: CloseInfo {
                    was_clean: true,
                    code: 1000,
                    reason: "done".to_string(),
                },
            }
        );
        assert_eq!(parsed.socket_id(), Some(SocketId::new(2)));
    }

    #[test]
    fn test_out_of_range_close_code_is_zero() {
        let json_str = r#"{
            "type": "webSocketClosed",
            "webSocketSerialID": 2,
            "wasClean": false,
            "code": 70000
        }"#;

        let event = Event::from_json(json_str).expect("parse event");
        match event.parse().expect("typed event") {
            BackendEvent::WebSocketClosed { close, .. } => assert_eq!(close.code, 0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_web_socket_opened_parsing() {
        let json_str = r#"{
            "type": "webSocketOpened",
            "webSocketSerialID": 4,
            "effectiveURI": "wss://example.com/socket",
            "protocols": "wamp.2.json",
            "extensions": "permessage-deflate"
        }"#;

        let event = Event::from_json(json_str).expect("parse event");
        match event.parse().expect("typed event") {
            BackendEvent::WebSocketOpened {
                effective_uri,
                protocols,
                extensions,
                ..
            } => {
                assert_eq!(effective_uri, "wss://example.com/socket");
                assert_eq!(protocols, "wamp.2.json");
                assert_eq!(extensions, "permessage-deflate");
            }
            other => panic!("unexpected parsed event: {other:?}"),
        }
    }

    #[test]
    fn test_missing_socket_id_is_error() {
        let event = Event::from_json(r#"{"type": "webSocketCreated", "uri": "ws://x"}"#)
            .expect("parse event");
        let err = event.parse().unwrap_err();
        assert!(matches!(err, Error::InvalidEvent { .. }));
    }

    #[test]
    fn test_missing_frame_data_is_error() {
        let event = Event::from_json(r#"{"type": "frameSent", "webSocketSerialID": 1}"#)
            .expect("parse event");
        assert!(event.parse().is_err());
    }

    #[test]
    fn test_frame_accessor() {
        let captured = CapturedFrame::new(SocketId::new(1), true, FrameData::text("h", 1));
        let event = BackendEvent::FrameSent(captured.clone());
        assert_eq!(event.frame(), Some(&captured));
        assert!(BackendEvent::TabNavigated.frame().is_none());
    }

    #[test]
    fn test_tab_navigated() {
        let event = Event::from_json(r#"{"type": "tabNavigated"}"#).expect("parse event");
        assert_eq!(event.parse().expect("typed"), BackendEvent::TabNavigated);
    }

    #[test]
    fn test_unknown_event() {
        let event = Event::from_json(r#"{"type": "custom", "foo": "bar"}"#).expect("parse event");
        match event.parse().expect("typed") {
            BackendEvent::Unknown { event_type, params } => {
                assert_eq!(event_type, "custom");
                assert_eq!(params["foo"], "bar");
            }
            other => panic!("expected Unknown variant, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_is_json_error() {
        assert!(matches!(Event::from_json("[1,2]"), Err(Error::Json(_))));
    }
}
