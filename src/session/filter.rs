//! Frame list filtering.
//!
//! A [`FrameFilter`] is plain state owned by the caller and passed to
//! [`FrameLog::filter`](super::FrameLog::filter). All set criteria must
//! match.
//!
//! # Example
//!
//! ```
//! use websocket_monitor::{Direction, FrameFilter, Protocol};
//!
//! let filter = FrameFilter::new()
//!     .with_text("chat")?
//!     .with_direction(Direction::Received)
//!     .with_protocol(Protocol::SocketIo);
//! assert!(filter.is_active());
//! # Ok::<(), websocket_monitor::Error>(())
//! ```

// ============================================================================
// Imports
// ============================================================================

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::decode::Protocol;
use crate::error::{Error, Result};
use crate::frame::{ConnectionSummary, Direction, Frame};
use crate::identifiers::SocketId;

// ============================================================================
// FrameFilter
// ============================================================================

/// Criteria selecting frames from the log.
#[derive(Debug, Clone, Default)]
pub struct FrameFilter {
    /// Payload search.
    search: Option<Regex>,
    /// Only frames of this socket.
    socket_id: Option<SocketId>,
    /// Only frames in this direction.
    direction: Option<Direction>,
    /// Only frames that decoded as this protocol.
    protocol: Option<Protocol>,
}

impl FrameFilter {
    /// Creates a filter matching every frame.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches payloads containing `text`, case-insensitively.
    ///
    /// Empty text removes the search criterion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Regex`] if the escaped text exceeds regex size limits.
    pub fn with_text(mut self, text: &str) -> Result<Self> {
        self.search = if text.is_empty() {
            None
        } else {
            Some(
                RegexBuilder::new(&regex::escape(text))
                    .case_insensitive(true)
                    .build()?,
            )
        };
        Ok(self)
    }

    /// Matches payloads against a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFilter`] if the pattern does not compile.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::invalid_filter(e.to_string()))?;
        self.search = Some(regex);
        Ok(self)
    }

    /// Restricts to one socket.
    #[inline]
    #[must_use]
    pub fn with_socket(mut self, socket_id: SocketId) -> Self {
        self.socket_id = Some(socket_id);
        self
    }

    /// Restricts to one direction.
    #[inline]
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Restricts to frames that decoded as `protocol`.
    #[inline]
    #[must_use]
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Returns `true` if any criterion is set.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.search.is_some()
            || self.socket_id.is_some()
            || self.direction.is_some()
            || self.protocol.is_some()
    }

    /// Returns `true` if `frame` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, frame: &Frame) -> bool {
        self.socket_id.is_none_or(|id| frame.socket_id == id)
            && self.direction.is_none_or(|d| frame.direction() == d)
            && self
                .protocol
                .is_none_or(|p| frame.classification.has(p))
            && self
                .search
                .as_ref()
                .is_none_or(|regex| regex.is_match(frame.payload()))
    }
}

// ============================================================================
// FilteredFrames
// ============================================================================

/// Frames selected by a filter, with a summary over them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredFrames {
    /// Matching frames, oldest first.
    pub frames: Vec<Frame>,
    /// Summary over the matching frames.
    pub summary: ConnectionSummary,
}

// ============================================================================
// Tests
// ============================================================================
