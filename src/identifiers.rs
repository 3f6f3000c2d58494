//! Type-safe identifier wrappers.
//!
//! Newtypes prevent mixing a frame id with a WebSocket serial id at
//! compile time.
//!
//! | Type | Source | Description |
//! |------|--------|-------------|
//! | [`FrameId`] | Frame log | Monotonic frame number within a session |
//! | [`SocketId`] | Backend | `webSocketSerialID` of a WebSocket |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// FrameId
// ============================================================================

/// Identifier of a frame in the frame log.
///
/// Assigned by [`crate::session::FrameLog`]; strictly increasing in
/// arrival order and never reused within a session, even after eviction
/// or clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(u64);

impl FrameId {
    /// Creates a frame id from a raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the id following this one.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SocketId
// ============================================================================

/// Serial id the browser assigns to each WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(u32);

impl SocketId {
    /// Creates a socket id from the backend serial number.
    #[inline]
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw serial number.
    #[inline]
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_id_next() {
        let id = FrameId::new(41);
        assert_eq!(id.next(), FrameId::new(42));
        assert!(id < id.next());
    }

    #[test]
    fn test_socket_id_display() {
        assert_eq!(SocketId::new(3).to_string(), "3");
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let json = serde_json::to_string(&SocketId::new(12)).expect("serialize");
        assert_eq!(json, "12");

        let id: FrameId = serde_json::from_str("9").expect("deserialize");
        assert_eq!(id.as_u64(), 9);
    }
}
