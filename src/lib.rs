//! WebSocket Monitor - frame inspection core.
//!
//! This library sniffs the application protocol carried by WebSocket text
//! frames, decodes it into structured values and keeps a bounded,
//! searchable log of classified frames per inspected tab.
//!
//! # Architecture
//!
//! ```text
//! backend event ──► Event::parse ──► Session::handle ──► ViewMessage
//!                                       │
//!                       Classifier ◄────┤ (one pass per frame)
//!                  Socket.IO / SockJS   │
//!                    WAMP / JSON        ▼
//!                                 FrameLog + ConnectionRegistry
//! ```
//!
//! Key design principles:
//!
//! - Decoders are independent; a payload may match several protocols
//! - A decoder that fails or panics never affects the others
//! - Classification is pure: the same payload always yields the same result
//! - The [`Monitor`] event loop is the only writer of session state
//!
//! # Quick Start
//!
//! ```
//! use websocket_monitor::{Classifier, Protocol};
//!
//! let classifier = Classifier::new();
//! let classification = classifier.classify(r#"42["chat",{"text":"hi"}]"#);
//!
//! assert!(classification.has(Protocol::SocketIo));
//! assert!(!classification.has(Protocol::Json));
//! assert_eq!(classification.preview_protocol(), Some(Protocol::SocketIo));
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decode`] | Per-protocol decoders and the [`Decoder`] trait |
//! | [`classifier`] | [`Classifier`] and [`Classification`] |
//! | [`frame`] | Captured frame data and logged [`Frame`]s |
//! | [`session`] | Frame log, filters and connection registry |
//! | [`monitor`] | Background [`Monitor`] task and [`MonitorHandle`] |
//! | [`protocol`] | Backend events and view messages |
//! | [`options`] | [`MonitorOptions`] |
//! | [`format`] | Display helpers |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |

// ============================================================================
// Modules
// ============================================================================

/// Frame classification across all enabled decoders.
pub mod classifier;

/// Sub-protocol decoders.
///
/// - [`SocketIoDecoder`] - Socket.IO packets (`42["event",...]`)
/// - [`SockJsDecoder`] - SockJS framing (`o`, `h`, `a[...]`, `c[...]`)
/// - [`WampDecoder`] - WAMP v2 messages (`[48,1,{},"proc"]`)
/// - [`JsonDecoder`] - Plain JSON
pub mod decode;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Display helpers for sizes, durations and payload previews.
pub mod format;

/// Captured and logged frame types.
pub mod frame;

/// Type-safe identifiers for frames and sockets.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Background monitor task.
pub mod monitor;

/// Monitor configuration.
pub mod options;

/// Backend event and view message types.
pub mod protocol;

/// Per-tab session state.
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

// Classification types
pub use classifier::{Classification, Classifier};

// Decoder types
pub use decode::{
    DecodeResult, Decoder, JsonDecoder, Miss, PacketType, Protocol, SockJsDecoder, SockJsFrame,
    SocketIoDecoder, SocketIoPacket, WampDecoder, WampMessage, WampMessageType,
};

// Error types
pub use error::{Error, Result};

// Frame types
pub use frame::{CapturedFrame, ConnectionSummary, Direction, Frame, FrameData, OpCode};

// Identifier types
pub use identifiers::{FrameId, SocketId};

// Monitor types
pub use monitor::{Monitor, MonitorHandle};

// Configuration types
pub use options::{MonitorOptions, Perspective};

// Protocol types
pub use protocol::{BackendEvent, Event, ViewMessage};

// Session types
pub use session::{
    CloseInfo, Connection, ConnectionRegistry, ConnectionState, FilteredFrames, FrameFilter,
    FrameLog, Session,
};
