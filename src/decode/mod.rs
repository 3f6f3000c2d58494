//! Sub-protocol decoders for WebSocket frame payloads.
//!
//! Each decoder sniffs one messaging protocol layered on top of WebSocket
//! and, when the payload matches, decodes it into a structured value.
//!
//! # Protocols
//!
//! | Decoder | Protocol | Result |
//! |---------|----------|--------|
//! | [`SocketIoDecoder`] | Socket.IO packet encoding | [`SocketIoPacket`] |
//! | [`SockJsDecoder`] | SockJS single-letter frames | [`SockJsFrame`] |
//! | [`WampDecoder`] | WAMP v2 JSON arrays | [`WampMessage`] |
//! | [`JsonDecoder`] | Plain JSON | [`serde_json::Value`] |
//!
//! A payload that does not match is a [`Miss`], not an error. Decoders
//! never mutate the payload and carry no state between calls.

// ============================================================================
// Submodules
// ============================================================================

/// Plain JSON fallback decoder.
pub mod json;

/// SockJS frame decoder.
pub mod sockjs;

/// Socket.IO packet decoder.
pub mod socket_io;

/// WAMP message decoder.
pub mod wamp;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Re-exports
// ============================================================================

pub use json::JsonDecoder;
pub use sockjs::{SockJsDecoder, SockJsFrame};
pub use socket_io::{PacketType, SocketIoDecoder, SocketIoPacket};
pub use wamp::{WampDecoder, WampMessage, WampMessageType};

// ============================================================================
// Protocol
// ============================================================================

/// Sub-protocols the classifier knows how to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Protocol {
    /// Socket.IO (optionally inside an Engine.IO message packet).
    SocketIo,
    /// SockJS.
    SockJs,
    /// Web Application Messaging Protocol.
    Wamp,
    /// Plain JSON.
    Json,
}

impl Protocol {
    /// All protocols in classification order.
    pub const ALL: [Protocol; 4] = [
        Protocol::SocketIo,
        Protocol::SockJs,
        Protocol::Wamp,
        Protocol::Json,
    ];

    /// Human readable protocol name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SocketIo => "Socket.IO",
            Self::SockJs => "SockJS",
            Self::Wamp => "WAMP",
            Self::Json => "JSON",
        }
    }

    /// Creates the default decoder for this protocol.
    #[must_use]
    pub fn decoder(&self) -> Box<dyn Decoder> {
        match self {
            Self::SocketIo => Box::new(SocketIoDecoder),
            Self::SockJs => Box::new(SockJsDecoder),
            Self::Wamp => Box::new(WampDecoder),
            Self::Json => Box::new(JsonDecoder),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// DecodeResult
// ============================================================================

/// Successful decode, tagged by protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    /// Socket.IO packet.
    SocketIo(SocketIoPacket),
    /// SockJS frame.
    SockJs(SockJsFrame),
    /// WAMP message.
    Wamp(WampMessage),
    /// Any JSON value.
    Json(Value),
}

impl DecodeResult {
    /// Returns the protocol this result belongs to.
    #[inline]
    #[must_use]
    pub const fn protocol(&self) -> Protocol {
        match self {
            Self::SocketIo(_) => Protocol::SocketIo,
            Self::SockJs(_) => Protocol::SockJs,
            Self::Wamp(_) => Protocol::Wamp,
            Self::Json(_) => Protocol::Json,
        }
    }
}

// ============================================================================
// Miss
// ============================================================================

/// Why a payload was not recognised by a decoder.
///
/// A miss is an expected outcome of classification and never surfaces as
/// a crate [`Error`](crate::Error).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Miss {
    /// Payload is empty.
    #[error("empty payload")]
    Empty,

    /// Payload (or the part that must be JSON) is not valid JSON.
    #[error("not JSON: {0}")]
    NotJson(String),

    /// Leading type marker is not part of the protocol.
    #[error("unknown {protocol} type: {found}")]
    UnknownType {
        /// Protocol that rejected the payload.
        protocol: Protocol,
        /// The unrecognised marker.
        found: String,
    },

    /// Type marker is valid but the rest of the frame is not.
    #[error("malformed {protocol} frame: {reason}")]
    Malformed {
        /// Protocol that rejected the payload.
        protocol: Protocol,
        /// What is wrong with the frame.
        reason: &'static str,
    },

    /// Decoder panicked; the classifier recovered.
    #[error("{protocol} decoder panicked")]
    Panicked {
        /// Protocol whose decoder panicked.
        protocol: Protocol,
    },
}

impl Miss {
    /// Creates a not-JSON miss from a parse error.
    #[inline]
    pub fn not_json(err: serde_json::Error) -> Self {
        Self::NotJson(err.to_string())
    }

    /// Creates an unknown type miss.
    #[inline]
    pub fn unknown_type(protocol: Protocol, found: impl Into<String>) -> Self {
        Self::UnknownType {
            protocol,
            found: found.into(),
        }
    }

    /// Creates a malformed frame miss.
    #[inline]
    pub const fn malformed(protocol: Protocol, reason: &'static str) -> Self {
        Self::Malformed { protocol, reason }
    }
}

// ============================================================================
// Decoder
// ============================================================================

/// A sub-protocol decoder.
///
/// Implementations must be stateless across calls: decoding the same
/// payload twice yields equal results.
pub trait Decoder: Send + Sync {
    /// Protocol this decoder recognises.
    fn protocol(&self) -> Protocol;

    /// Attempts to decode `payload`.
    ///
    /// # Errors
    ///
    /// Returns a [`Miss`] when the payload is not this protocol.
    fn decode(&self, payload: &str) -> Result<DecodeResult, Miss>;
}

// ============================================================================
// Tests
// ============================================================================
