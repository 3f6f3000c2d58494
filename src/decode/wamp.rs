//! WAMP v2 message decoder.
//!
//! A WAMP message is a JSON array whose first element is the message type
//! code. The remaining positional elements are named according to the
//! layout of that message type:
//!
//! ```text
//! [48, 7814135, {}, "com.myapp.echo", ["hello"]]
//!  │   │        │   │                 └ args
//!  │   │        │   └ procedure
//!  │   │        └ options
//!  │   └ requestId
//!  └ CALL
//! ```
//!
//! Parsing first produces an internal record that also carries decoder
//! bookkeeping: the raw type code and any elements beyond the layout.
//! Converting it into a [`WampMessage`] drops that bookkeeping, so only the
//! named protocol fields reach the consumer. Nested objects are passed
//! through untouched, including keys that start with `_`.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use super::{DecodeResult, Decoder, Miss, Protocol};

// ============================================================================
// WampMessageType
// ============================================================================

/// WAMP message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WampMessageType {
    Hello,
    Welcome,
    Abort,
    Goodbye,
    Error,
    Publish,
    Published,
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Event,
    Call,
    Cancel,
    Result,
    Register,
    Registered,
    Unregister,
    Unregistered,
    Invocation,
    Interrupt,
    Yield,
}

impl WampMessageType {
    /// Maps a type code to a message type.
    #[must_use]
    pub const fn from_code(code: u64) -> Option<Self> {
        Some(match code {
            1 => Self::Hello,
            2 => Self::Welcome,
            3 => Self::Abort,
            6 => Self::Goodbye,
            8 => Self::Error,
            16 => Self::Publish,
            17 => Self::Published,
            32 => Self::Subscribe,
            33 => Self::Subscribed,
            34 => Self::Unsubscribe,
            35 => Self::Unsubscribed,
            36 => Self::Event,
            48 => Self::Call,
            49 => Self::Cancel,
            50 => Self::Result,
            64 => Self::Register,
            65 => Self::Registered,
            66 => Self::Unregister,
            67 => Self::Unregistered,
            68 => Self::Invocation,
            69 => Self::Interrupt,
            70 => Self::Yield,
            _ => return None,
        })
    }

    /// Type code on the wire.
    #[must_use]
    pub const fn code(&self) -> u64 {
        match self {
            Self::Hello => 1,
            Self::Welcome => 2,
            Self::Abort => 3,
            Self::Goodbye => 6,
            Self::Error => 8,
            Self::Publish => 16,
            Self::Published => 17,
            Self::Subscribe => 32,
            Self::Subscribed => 33,
            Self::Unsubscribe => 34,
            Self::Unsubscribed => 35,
            Self::Event => 36,
            Self::Call => 48,
            Self::Cancel => 49,
            Self::Result => 50,
            Self::Register => 64,
            Self::Registered => 65,
            Self::Unregister => 66,
            Self::Unregistered => 67,
            Self::Invocation => 68,
            Self::Interrupt => 69,
            Self::Yield => 70,
        }
    }

    /// Names of the positional elements following the type code.
    #[must_use]
    pub const fn layout(&self) -> &'static [&'static str] {
        match self {
            Self::Hello => &["realm", "details"],
            Self::Welcome => &["session", "details"],
            Self::Abort | Self::Goodbye => &["details", "reason"],
            Self::Error => &[
                "requestType",
                "requestId",
                "details",
                "error",
                "args",
                "kwargs",
            ],
            Self::Publish => &["requestId", "options", "topic", "args", "kwargs"],
            Self::Published => &["requestId", "publicationId"],
            Self::Subscribe => &["requestId", "options", "topic"],
            Self::Subscribed => &["requestId", "subscriptionId"],
            Self::Unsubscribe => &["requestId", "subscriptionId"],
            Self::Unsubscribed | Self::Unregistered => &["requestId"],
            Self::Event => &[
                "subscriptionId",
                "publicationId",
                "details",
                "args",
                "kwargs",
            ],
            Self::Call => &["requestId", "options", "procedure", "args", "kwargs"],
            Self::Cancel | Self::Interrupt => &["requestId", "options"],
            Self::Result => &["requestId", "details", "args", "kwargs"],
            Self::Register => &["requestId", "options", "procedure"],
            Self::Registered => &["requestId", "registrationId"],
            Self::Unregister => &["requestId", "registrationId"],
            Self::Invocation => &["requestId", "registrationId", "details", "args", "kwargs"],
            Self::Yield => &["requestId", "options", "args", "kwargs"],
        }
    }
}

// ============================================================================
// WampMessage
// ============================================================================

/// A decoded WAMP message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WampMessage {
    /// Message type.
    pub message_type: WampMessageType,

    /// Named positional elements.
    pub fields: Map<String, Value>,
}

impl WampMessage {
    /// Returns a named field.
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns the request id, if the message type carries one.
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> Option<u64> {
        self.get("requestId").and_then(Value::as_u64)
    }
}

// ============================================================================
// WampDecoder
// ============================================================================

/// Decoder for WAMP v2 JSON serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct WampDecoder;

impl WampDecoder {
    /// Decodes a single WAMP message.
    ///
    /// # Errors
    ///
    /// Returns a [`Miss`] if the payload is not a JSON array, the array is
    /// empty, or the type code is not in the WAMP table.
    pub fn parse(payload: &str) -> Result<WampMessage, Miss> {
        let Value::Array(items) = serde_json::from_str::<Value>(payload).map_err(Miss::not_json)?
        else {
            return Err(Miss::malformed(Protocol::Wamp, "not an array"));
        };

        ParsedWamp::from_items(items).map(WampMessage::from)
    }
}

impl Decoder for WampDecoder {
    fn protocol(&self) -> Protocol {
        Protocol::Wamp
    }

    fn decode(&self, payload: &str) -> Result<DecodeResult, Miss> {
        Self::parse(payload).map(DecodeResult::Wamp)
    }
}

// ============================================================================
// ParsedWamp
// ============================================================================

/// Decoder-side view of a WAMP message, before hand-off.
#[derive(Debug)]
struct ParsedWamp {
    message_type: WampMessageType,

    /// The type code as it appeared on the wire.
    code: Value,

    /// Named positional elements.
    fields: Map<String, Value>,

    /// Positional elements beyond the layout of `message_type`.
    surplus: Vec<Value>,
}

impl ParsedWamp {
    /// Names the elements of a decoded JSON array.
    fn from_items(items: Vec<Value>) -> Result<Self, Miss> {
        let mut items = items.into_iter();
        let code = items
            .next()
            .ok_or_else(|| Miss::malformed(Protocol::Wamp, "empty array"))?;
        let message_type = code
            .as_u64()
            .and_then(WampMessageType::from_code)
            .ok_or_else(|| Miss::unknown_type(Protocol::Wamp, code.to_string()))?;

        let mut fields = Map::new();
        let mut surplus = Vec::new();
        let mut layout = message_type.layout().iter();
        for item in items {
            match layout.next() {
                Some(name) => {
                    fields.insert((*name).to_string(), item);
                }
                None => surplus.push(item),
            }
        }

        Ok(Self {
            message_type,
            code,
            fields,
            surplus,
        })
    }
}

impl From<ParsedWamp> for WampMessage {
    fn from(parsed: ParsedWamp) -> Self {
        if !parsed.surplus.is_empty() {
            trace!(
                code = %parsed.code,
                surplus = parsed.surplus.len(),
                "Dropping WAMP elements beyond layout"
            );
        }
        Self {
            message_type: parsed.message_type,
            fields: parsed.fields,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
