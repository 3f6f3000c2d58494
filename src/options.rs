//! Monitor configuration.
//!
//! # Example
//!
//! ```
//! use websocket_monitor::{MonitorOptions, Perspective, Protocol};
//!
//! let options = MonitorOptions::new()
//!     .with_max_frames(1000)
//!     .with_protocols([Protocol::SocketIo, Protocol::Json])
//!     .with_perspective(Perspective::Table);
//!
//! assert!(options.validate().is_ok());
//! assert!(options.is_enabled(Protocol::Json));
//! assert!(!options.is_enabled(Protocol::Wamp));
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::decode::Protocol;
use crate::error::{Error, Result};
use crate::session::DEFAULT_MAX_FRAMES;

// ============================================================================
// Constants
// ============================================================================

/// Default number of view updates buffered for a slow consumer.
pub const DEFAULT_VIEW_CAPACITY: usize = 1024;

// ============================================================================
// Perspective
// ============================================================================

/// How the frame list is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Perspective {
    /// One row per frame with a payload preview.
    #[default]
    List,
    /// Tabular view with one column per field.
    Table,
}

// ============================================================================
// MonitorOptions
// ============================================================================

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorOptions {
    /// Frames kept before the oldest is evicted.
    pub max_frames: usize,

    /// Enabled decoders, in classification order.
    pub protocols: Vec<Protocol>,

    /// Frame list presentation.
    pub perspective: Perspective,

    /// Start with frame capture paused.
    pub paused: bool,

    /// View updates buffered before new ones are dropped.
    pub view_capacity: usize,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl MonitorOptions {
    /// Creates options with every protocol enabled.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            protocols: Protocol::ALL.to_vec(),
            perspective: Perspective::List,
            paused: false,
            view_capacity: DEFAULT_VIEW_CAPACITY,
        }
    }

    /// Parses options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is malformed, or
    /// [`Error::Config`] if the result fails [`validate`](Self::validate).
    pub fn from_json(text: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl MonitorOptions {
    /// Sets the frame log capacity.
    #[inline]
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Replaces the enabled protocol set. Duplicates are dropped.
    #[must_use]
    pub fn with_protocols(mut self, protocols: impl IntoIterator<Item = Protocol>) -> Self {
        self.protocols.clear();
        for protocol in protocols {
            if !self.protocols.contains(&protocol) {
                self.protocols.push(protocol);
            }
        }
        self
    }

    /// Disables one protocol.
    #[inline]
    #[must_use]
    pub fn without_protocol(mut self, protocol: Protocol) -> Self {
        self.protocols.retain(|p| *p != protocol);
        self
    }

    /// Sets the frame list presentation.
    #[inline]
    #[must_use]
    pub fn with_perspective(mut self, perspective: Perspective) -> Self {
        self.perspective = perspective;
        self
    }

    /// Sets the initial pause state.
    #[inline]
    #[must_use]
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Sets how many view updates are buffered for the consumer.
    #[inline]
    #[must_use]
    pub fn with_view_capacity(mut self, view_capacity: usize) -> Self {
        self.view_capacity = view_capacity;
        self
    }
}

// ============================================================================
// Validation & Accessors
// ============================================================================

impl MonitorOptions {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either capacity is zero or no protocol
    /// is enabled.
    pub fn validate(&self) -> Result<()> {
        if self.max_frames == 0 {
            return Err(Error::config("max_frames must be greater than zero"));
        }
        if self.view_capacity == 0 {
            return Err(Error::config("view_capacity must be greater than zero"));
        }
        if self.protocols.is_empty() {
            return Err(Error::config("at least one protocol must be enabled"));
        }
        Ok(())
    }

    /// Returns `true` if `protocol` is enabled.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self, protocol: Protocol) -> bool {
        self.protocols.contains(&protocol)
    }

    /// Returns `true` if frames are shown as a table.
    #[inline]
    #[must_use]
    pub fn is_tabular(&self) -> bool {
        self.perspective == Perspective::Table
    }

    /// Returns `true` if capture starts paused.
    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_default() {
        let options = MonitorOptions::new();
        assert_eq!(options.max_frames, 5000);
        assert_eq!(options.protocols, Protocol::ALL.to_vec());
        assert_eq!(options.perspective, Perspective::List);
        assert!(!options.is_paused());
        assert_eq!(options.view_capacity, DEFAULT_VIEW_CAPACITY);
        assert_eq!(options, MonitorOptions::default());
    }

    #[test]
    fn test_builder_chain() {
        let options = MonitorOptions::new()
            .with_max_frames(10)
            .with_perspective(Perspective::Table)
            .with_paused(true)
            .without_protocol(Protocol::Wamp);

        assert_eq!(options.max_frames, 10);
        assert!(options.is_tabular());
        assert!(options.is_paused());
        assert!(!options.is_enabled(Protocol::Wamp));
        assert!(options.is_enabled(Protocol::SockJs));
    }

    #[test]
    fn test_with_protocols_dedups() {
        let options =
            MonitorOptions::new().with_protocols([Protocol::Json, Protocol::Json, Protocol::Wamp]);
        assert_eq!(options.protocols, vec![Protocol::Json, Protocol::Wamp]);
    }

    #[test]
    fn test_validate_zero_capacity() {
        let err = MonitorOptions::new().with_max_frames(0).validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_zero_view_capacity() {
        let options = MonitorOptions::new().with_view_capacity(0);
        let err = options.validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_validate_no_protocols() {
        let options = MonitorOptions::new().with_protocols(Vec::new());
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let json = r#"{"maxFrames": 20, "perspective": "table"}"#;
        let options = MonitorOptions::from_json(json).expect("parse");
        assert_eq!(options.max_frames, 20);
        assert!(options.is_tabular());
        assert_eq!(options.protocols.len(), 4);
    }

    #[test]
    fn test_from_json_validates() {
        let err = MonitorOptions::from_json(r#"{"protocols": []}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
