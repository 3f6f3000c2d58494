//! Error types for the WebSocket monitor.
//!
//! This module defines the crate-level error type. Decoding failures are
//! NOT errors: a payload that is not Socket.IO (or SockJS, WAMP, JSON) is a
//! classification miss, see [`crate::decode::Miss`].
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use websocket_monitor::{MonitorOptions, Result};
//!
//! fn example() -> Result<()> {
//!     let options = MonitorOptions::new().with_max_frames(1000);
//!     options.validate()?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Backend events | [`Error::InvalidEvent`], [`Error::UnknownSocket`] |
//! | Session | [`Error::InvalidFilter`], [`Error::MonitorClosed`] |
//! | External | [`Error::Json`], [`Error::Regex`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::SocketId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when monitor options fail validation.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Backend Event Errors
    // ========================================================================
    /// Backend event is missing required data or has the wrong shape.
    #[error("Invalid backend event '{event}': {message}")]
    InvalidEvent {
        /// Event type name as sent by the backend.
        event: String,
        /// Description of what is wrong.
        message: String,
    },

    /// Event refers to a WebSocket the registry has never seen.
    #[error("Unknown WebSocket: {socket_id}")]
    UnknownSocket {
        /// The unknown serial id.
        socket_id: SocketId,
    },

    // ========================================================================
    // Session Errors
    // ========================================================================
    /// Frame filter could not be compiled.
    #[error("Invalid filter: {message}")]
    InvalidFilter {
        /// Description of the filter error.
        message: String,
    },

    /// Monitor event loop has shut down.
    #[error("Monitor closed")]
    MonitorClosed,

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regular expression error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid event error.
    #[inline]
    pub fn invalid_event(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEvent {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown socket error.
    #[inline]
    pub fn unknown_socket(socket_id: SocketId) -> Self {
        Self::UnknownSocket { socket_id }
    }

    /// Creates an invalid filter error.
    #[inline]
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was caused by backend input.
    #[inline]
    #[must_use]
    pub fn is_event_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent { .. } | Self::UnknownSocket { .. } | Self::Json(_)
        )
    }

    /// Returns `true` if the monitor can keep running after this error.
    ///
    /// Only a closed monitor is terminal.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::MonitorClosed)
    }
}

// ============================================================================
// Tests
// ============================================================================
