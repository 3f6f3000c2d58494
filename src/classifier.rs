//! Frame payload classification.
//!
//! The [`Classifier`] runs a payload through every registered
//! [`Decoder`] and keeps every successful decode. A payload can be valid
//! JSON and valid WAMP at the same time; both results are attached and
//! the rendering side picks which one to show.
//!
//! # Fault Isolation
//!
//! Each decoder call is wrapped in [`std::panic::catch_unwind`]. A decoder
//! that panics yields no result for its protocol while the other decoders
//! still run.
//!
//! # Example
//!
//! ```
//! use websocket_monitor::Classifier;
//!
//! let classifier = Classifier::new();
//! let classification = classifier.classify(r#"[48,1,{},"com.app.echo"]"#);
//!
//! assert!(classification.wamp.is_some());
//! assert!(classification.json.is_some());
//! assert!(classification.socket_io.is_none());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use serde_json::Value;
use tracing::{trace, warn};

use crate::decode::{
    DecodeResult, Decoder, Miss, Protocol, SockJsFrame, SocketIoPacket, WampMessage,
};

// ============================================================================
// Classification
// ============================================================================

/// Decode results attached to a frame, one optional field per protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Socket.IO packet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socket_io: Option<SocketIoPacket>,

    /// SockJS frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sock_js: Option<SockJsFrame>,

    /// WAMP message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wamp: Option<WampMessage>,

    /// Generic JSON value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

impl Classification {
    /// Stores a decode result in its protocol's field.
    pub fn attach(&mut self, result: DecodeResult) {
        match result {
            DecodeResult::SocketIo(packet) => self.socket_io = Some(packet),
            DecodeResult::SockJs(frame) => self.sock_js = Some(frame),
            DecodeResult::Wamp(message) => self.wamp = Some(message),
            DecodeResult::Json(value) => self.json = Some(value),
        }
    }

    /// Returns `true` if the protocol decoded successfully.
    #[inline]
    #[must_use]
    pub fn has(&self, protocol: Protocol) -> bool {
        match protocol {
            Protocol::SocketIo => self.socket_io.is_some(),
            Protocol::SockJs => self.sock_js.is_some(),
            Protocol::Wamp => self.wamp.is_some(),
            Protocol::Json => self.json.is_some(),
        }
    }

    /// Returns all protocols that decoded successfully.
    #[must_use]
    pub fn protocols(&self) -> Vec<Protocol> {
        Protocol::ALL
            .into_iter()
            .filter(|protocol| self.has(*protocol))
            .collect()
    }

    /// Returns `true` if no protocol matched.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.socket_io.is_none()
            && self.sock_js.is_none()
            && self.wamp.is_none()
            && self.json.is_none()
    }

    /// Protocol an inline preview shows: Socket.IO, then SockJS, then JSON.
    ///
    /// WAMP is never previewed on its own; its payload is always JSON.
    #[must_use]
    pub fn preview_protocol(&self) -> Option<Protocol> {
        [Protocol::SocketIo, Protocol::SockJs, Protocol::Json]
            .into_iter()
            .find(|protocol| self.has(*protocol))
    }
}

// ============================================================================
// Classifier
// ============================================================================

/// Runs payloads through a registry of decoders.
pub struct Classifier {
    decoders: Vec<Box<dyn Decoder>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier")
            .field("protocols", &self.protocols())
            .finish()
    }
}

impl Classifier {
    /// Creates a classifier with all built-in decoders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_protocols(&Protocol::ALL)
    }

    /// Creates a classifier with the built-in decoders for `protocols`.
    #[must_use]
    pub fn with_protocols(protocols: &[Protocol]) -> Self {
        Self {
            decoders: protocols.iter().map(Protocol::decoder).collect(),
        }
    }

    /// Creates a classifier from custom decoders.
    #[must_use]
    pub fn with_decoders(decoders: Vec<Box<dyn Decoder>>) -> Self {
        Self { decoders }
    }

    /// Adds a decoder to the registry.
    pub fn register(&mut self, decoder: Box<dyn Decoder>) {
        self.decoders.push(decoder);
    }

    /// Returns the protocols of the registered decoders, in run order.
    #[must_use]
    pub fn protocols(&self) -> Vec<Protocol> {
        self.decoders.iter().map(|d| d.protocol()).collect()
    }

    /// Classifies a text payload.
    ///
    /// Never panics because of a decoder; misses are logged at trace level.
    #[must_use]
    pub fn classify(&self, payload: &str) -> Classification {
        let mut classification = Classification::default();

        for decoder in &self.decoders {
            match Self::run(decoder.as_ref(), payload) {
                Ok(result) => classification.attach(result),
                Err(miss) => {
                    trace!(protocol = %decoder.protocol(), %miss, "Classification miss");
                }
            }
        }

        classification
    }

    /// Classifies a raw byte payload.
    ///
    /// Invalid UTF-8 sequences are replaced before decoding.
    #[must_use]
    pub fn classify_bytes(&self, payload: &[u8]) -> Classification {
        self.classify(&String::from_utf8_lossy(payload))
    }

    /// Runs one decoder, converting a panic into a miss.
    fn run(decoder: &dyn Decoder, payload: &str) -> Result<DecodeResult, Miss> {
        let protocol = decoder.protocol();
        catch_unwind(AssertUnwindSafe(|| decoder.decode(payload))).unwrap_or_else(|_| {
            warn!(%protocol, "Decoder panicked, treating as miss");
            Err(Miss::Panicked { protocol })
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
