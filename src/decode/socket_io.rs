//! Socket.IO packet decoder.
//!
//! # Encoding
//!
//! ```text
//! [4]<type>[<attachments>-][/<namespace>,][<ack id>][<json body>]
//! ```
//!
//! | Part | Description |
//! |------|-------------|
//! | `4` | Optional Engine.IO "message" envelope |
//! | `type` | Single digit, see [`PacketType`] |
//! | `attachments-` | Binary attachment count, binary types only |
//! | `/namespace,` | Namespace, `/` when omitted |
//! | `ack id` | Digits requesting an acknowledgement |
//! | `json body` | Packet data |
//!
//! Examples: `0`, `42["chat",{"text":"hi"}]`, `2/admin,17["kick"]`,
//! `451-["upload",{"_placeholder":true,"num":0}]`.
//!
//! A leading `4` followed by another type digit is read as the Engine.IO
//! envelope, so `42` is an EVENT rather than an ERROR carrying ack id 2.
//! Binary attachments are counted but not reassembled.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DecodeResult, Decoder, Miss, Protocol};

// ============================================================================
// Constants
// ============================================================================

/// Engine.IO packet type wrapping Socket.IO packets.
const ENGINE_IO_MESSAGE: u8 = b'4';

/// Namespace used when a packet omits one.
pub const DEFAULT_NAMESPACE: &str = "/";

// ============================================================================
// PacketType
// ============================================================================

/// Socket.IO packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketType {
    /// Namespace connection (0).
    Connect,
    /// Namespace disconnection (1).
    Disconnect,
    /// Event (2).
    Event,
    /// Acknowledgement (3).
    Ack,
    /// Error (4).
    Error,
    /// Event with binary attachments (5).
    BinaryEvent,
    /// Acknowledgement with binary attachments (6).
    BinaryAck,
}

impl PacketType {
    /// Maps an ASCII type digit to a packet type.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Self::Connect),
            b'1' => Some(Self::Disconnect),
            b'2' => Some(Self::Event),
            b'3' => Some(Self::Ack),
            b'4' => Some(Self::Error),
            b'5' => Some(Self::BinaryEvent),
            b'6' => Some(Self::BinaryAck),
            _ => None,
        }
    }

    /// Numeric type code.
    #[inline]
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Connect => 0,
            Self::Disconnect => 1,
            Self::Event => 2,
            Self::Ack => 3,
            Self::Error => 4,
            Self::BinaryEvent => 5,
            Self::BinaryAck => 6,
        }
    }

    /// Returns `true` for packet types that carry binary attachments.
    #[inline]
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::BinaryEvent | Self::BinaryAck)
    }
}

// ============================================================================
// SocketIoPacket
// ============================================================================

/// A decoded Socket.IO packet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketIoPacket {
    /// Packet type.
    #[serde(rename = "type")]
    pub packet_type: PacketType,

    /// Packet arrived inside an Engine.IO message envelope.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub engine_io: bool,

    /// Number of binary attachments that follow in separate frames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<u32>,

    /// Namespace, `None` for the default namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Acknowledgement id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ack_id: Option<u64>,

    /// JSON body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl SocketIoPacket {
    /// Returns the namespace, resolving the default.
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Returns the event name for EVENT packets (`["name", ...args]`).
    #[must_use]
    pub fn event_name(&self) -> Option<&str> {
        match self.packet_type {
            PacketType::Event | PacketType::BinaryEvent => self
                .body
                .as_ref()
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(Value::as_str),
            _ => None,
        }
    }
}

// ============================================================================
// SocketIoDecoder
// ============================================================================

/// Decoder for the Socket.IO text packet encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocketIoDecoder;

impl SocketIoDecoder {
    /// Decodes a single text packet.
    ///
    /// # Errors
    ///
    /// Returns a [`Miss`] if the type digit is unknown, a binary packet
    /// lacks its attachment count, the ack id overflows, or the body is not
    /// valid JSON.
    pub fn parse(payload: &str) -> Result<SocketIoPacket, Miss> {
        let bytes = payload.as_bytes();
        let first = *bytes.first().ok_or(Miss::Empty)?;

        let engine_io = first == ENGINE_IO_MESSAGE
            && bytes
                .get(1)
                .is_some_and(|b| PacketType::from_byte(*b).is_some());
        let mut pos = usize::from(engine_io);

        let packet_type = PacketType::from_byte(bytes[pos]).ok_or_else(|| {
            let found = payload[pos..].chars().next().unwrap_or_default();
            Miss::unknown_type(Protocol::SocketIo, found.to_string())
        })?;
        pos += 1;

        let attachments = if packet_type.is_binary() {
            let end = pos + count_digits(&bytes[pos..]);
            if end == pos || bytes.get(end) != Some(&b'-') {
                return Err(Miss::malformed(
                    Protocol::SocketIo,
                    "binary packet without attachment count",
                ));
            }
            let count = payload[pos..end].parse::<u32>().map_err(|_| {
                Miss::malformed(Protocol::SocketIo, "attachment count out of range")
            })?;
            pos = end + 1;
            Some(count)
        } else {
            None
        };

        let namespace = if bytes.get(pos) == Some(&b'/') {
            let end = bytes[pos..]
                .iter()
                .position(|&b| b == b',')
                .map_or(bytes.len(), |offset| pos + offset);
            let namespace = &payload[pos..end];
            pos = (end + 1).min(bytes.len());
            (namespace != DEFAULT_NAMESPACE).then(|| namespace.to_string())
        } else {
            None
        };

        let ack_digits = count_digits(&bytes[pos..]);
        let ack_id = if ack_digits > 0 {
            let id = payload[pos..pos + ack_digits]
                .parse::<u64>()
                .map_err(|_| Miss::malformed(Protocol::SocketIo, "ack id out of range"))?;
            pos += ack_digits;
            Some(id)
        } else {
            None
        };

        let body = if pos < bytes.len() {
            Some(serde_json::from_str::<Value>(&payload[pos..]).map_err(Miss::not_json)?)
        } else {
            None
        };

        Ok(SocketIoPacket {
            packet_type,
            engine_io,
            attachments,
            namespace,
            ack_id,
            body,
        })
    }
}

impl Decoder for SocketIoDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::SocketIo
    }

    fn decode(&self, payload: &str) -> Result<DecodeResult, Miss> {
        Self::parse(payload).map(DecodeResult::SocketIo)
    }
}

/// Length of the leading run of ASCII digits.
#[inline]
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_without_body() {
        let packet = SocketIoDecoder::parse("0").expect("connect");
        assert_eq!(packet.packet_type, PacketType::Connect);
        assert!(!packet.engine_io);
        assert_eq!(packet.namespace(), "/");
        assert!(packet.ack_id.is_none());
        assert!(packet.body.is_none());
    }

    #[test]
    fn test_engine_io_wrapped_event() {
        let packet = SocketIoDecoder::parse(r#"42["event",1]"#).expect("event");
        assert_eq!(packet.packet_type, PacketType::Event);
        assert!(packet.engine_io);
        assert!(packet.ack_id.is_none());
        assert_eq!(packet.body, Some(json!(["event", 1])));
        assert_eq!(packet.event_name(), Some("event"));
    }

    #[test]
    fn test_namespace_and_ack_id() {
        let packet = SocketIoDecoder::parse(r#"2/chat,17["msg",{"text":"hi"}]"#).expect("event");
        assert_eq!(packet.packet_type, PacketType::Event);
        assert_eq!(packet.namespace(), "/chat");
        assert_eq!(packet.ack_id, Some(17));
        assert_eq!(packet.body, Some(json!(["msg", {"text": "hi"}])));
    }

    #[test]
    fn test_namespace_without_comma() {
        let packet = SocketIoDecoder::parse("40/admin").expect("connect");
        assert_eq!(packet.packet_type, PacketType::Connect);
        assert_eq!(packet.namespace.as_deref(), Some("/admin"));
        assert!(packet.body.is_none());
    }

    #[test]
    fn test_explicit_default_namespace_is_normalized() {
        let packet = SocketIoDecoder::parse(r#"2/,["ping"]"#).expect("event");
        assert!(packet.namespace.is_none());
    }

    #[test]
    fn test_bad_json_body_is_miss() {
        let result = SocketIoDecoder::parse(r#"2/chat,{"bad json"#);
        assert!(matches!(result, Err(Miss::NotJson(_))));
    }

    #[test]
    fn test_unknown_type_is_miss() {
        assert!(matches!(
            SocketIoDecoder::parse("9"),
            Err(Miss::UnknownType { .. })
        ));
        assert!(matches!(
            SocketIoDecoder::parse("hello"),
            Err(Miss::UnknownType { .. })
        ));
    }

    #[test]
    fn test_non_ascii_first_char_is_miss() {
        assert!(matches!(
            SocketIoDecoder::parse("é"),
            Err(Miss::UnknownType { found, .. }) if found == "é"
        ));
    }

    #[test]
    fn test_empty_is_miss() {
        assert_eq!(SocketIoDecoder::parse(""), Err(Miss::Empty));
    }

    #[test]
    fn test_binary_event_attachments() {
        let packet = SocketIoDecoder::parse(r#"451-["upload",{"_placeholder":true,"num":0}]"#)
            .expect("binary event");
        assert_eq!(packet.packet_type, PacketType::BinaryEvent);
        assert_eq!(packet.attachments, Some(1));
        assert_eq!(packet.event_name(), Some("upload"));
    }

    #[test]
    fn test_binary_without_count_is_miss() {
        let result = SocketIoDecoder::parse(r#"5["upload"]"#);
        assert!(matches!(result, Err(Miss::Malformed { .. })));
    }

    #[test]
    fn test_ack_id_overflow_is_miss() {
        let result = SocketIoDecoder::parse("3999999999999999999999999[]");
        assert!(matches!(result, Err(Miss::Malformed { .. })));
    }

    #[test]
    fn test_bare_error_packet() {
        let packet = SocketIoDecoder::parse(r#"4{"message":"denied"}"#).expect("error");
        assert_eq!(packet.packet_type, PacketType::Error);
        assert!(!packet.engine_io);
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let packet = SocketIoDecoder::parse("0").expect("connect");
        let json = serde_json::to_value(&packet).expect("serialize");
        assert_eq!(json, json!({"type": "connect"}));
    }

    #[test]
    fn test_decoder_trait() {
        let result = SocketIoDecoder.decode("3[true]").expect("ack");
        assert_eq!(result.protocol(), Protocol::SocketIo);
    }
}
