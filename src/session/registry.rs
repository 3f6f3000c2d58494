//! WebSocket connection registry.
//!
//! Tracks every WebSocket of the inspected tab through its lifecycle:
//!
//! ```text
//! webSocketCreated ──► Connecting ──webSocketOpened──► Open ──webSocketClosed──► Closed
//! ```

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::Direction;
use crate::identifiers::SocketId;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of a WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    /// Created, handshake pending.
    Connecting,
    /// Handshake completed.
    Open,
    /// Closed.
    Closed,
}

// ============================================================================
// CloseInfo
// ============================================================================

/// How a WebSocket closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseInfo {
    /// Closing handshake completed.
    pub was_clean: bool,
    /// Close status code.
    pub code: u16,
    /// Close reason.
    pub reason: String,
}

// ============================================================================
// Connection
// ============================================================================

/// A tracked WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Serial id.
    #[serde(rename = "webSocketSerialID")]
    pub socket_id: SocketId,

    /// URI requested by the page.
    pub uri: String,

    /// URI after redirects, known once open.
    #[serde(rename = "effectiveURI", skip_serializing_if = "Option::is_none")]
    pub effective_uri: Option<String>,

    /// Sub-protocols (requested, then negotiated).
    pub protocols: String,

    /// Negotiated extensions.
    pub extensions: String,

    /// Lifecycle state.
    pub state: ConnectionState,

    /// Close details, once closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<CloseInfo>,

    /// Frames sent by the page.
    pub frames_sent: u64,

    /// Frames received by the page.
    pub frames_received: u64,
}

impl Connection {
    fn new(socket_id: SocketId, uri: &str, protocols: &str) -> Self {
        Self {
            socket_id,
            uri: uri.to_string(),
            effective_uri: None,
            protocols: protocols.to_string(),
            extensions: String::new(),
            state: ConnectionState::Connecting,
            close: None,
            frames_sent: 0,
            frames_received: 0,
        }
    }

    /// Returns `true` while the socket is open.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }
}

// ============================================================================
// ConnectionRegistry
// ============================================================================

/// WebSockets of the inspected tab, keyed by serial id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: FxHashMap<SocketId, Connection>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly created socket, replacing any stale entry.
    pub fn created(&mut self, socket_id: SocketId, uri: &str, protocols: &str) -> &Connection {
        debug!(%socket_id, uri, "WebSocket created");
        self.connections
            .entry(socket_id)
            .insert_entry(Connection::new(socket_id, uri, protocols))
            .into_mut()
    }

    /// Marks a socket open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSocket`] if the socket was never created.
    pub fn opened(
        &mut self,
        socket_id: SocketId,
        effective_uri: &str,
        protocols: &str,
        extensions: &str,
    ) -> Result<&Connection> {
        let connection = self.get_mut(socket_id)?;
        connection.state = ConnectionState::Open;
        connection.effective_uri = Some(effective_uri.to_string());
        connection.protocols = protocols.to_string();
        connection.extensions = extensions.to_string();

        debug!(%socket_id, effective_uri, protocols, "WebSocket opened");
        Ok(&*connection)
    }

    /// Marks a socket closed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSocket`] if the socket was never created.
    pub fn closed(&mut self, socket_id: SocketId, close: CloseInfo) -> Result<&Connection> {
        let connection = self.get_mut(socket_id)?;
        debug!(%socket_id, code = close.code, was_clean = close.was_clean, "WebSocket closed");

        connection.state = ConnectionState::Closed;
        connection.close = Some(close);
        Ok(&*connection)
    }

    /// Counts a frame against its socket.
    ///
    /// Returns `false` if the socket is unknown.
    pub fn record_frame(&mut self, socket_id: SocketId, direction: Direction) -> bool {
        let Some(connection) = self.connections.get_mut(&socket_id) else {
            return false;
        };
        match direction {
            Direction::Sent => connection.frames_sent += 1,
            Direction::Received => connection.frames_received += 1,
        }
        true
    }

    /// Returns a tracked socket.
    #[inline]
    #[must_use]
    pub fn get(&self, socket_id: SocketId) -> Option<&Connection> {
        self.connections.get(&socket_id)
    }

    /// Returns all tracked sockets ordered by serial id.
    #[must_use]
    pub fn connections(&self) -> Vec<&Connection> {
        let mut connections: Vec<_> = self.connections.values().collect();
        connections.sort_by_key(|c| c.socket_id);
        connections
    }

    /// Number of sockets currently open.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.connections.values().filter(|c| c.is_open()).count()
    }

    /// Number of tracked sockets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Returns `true` if no socket is tracked.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Forgets all sockets.
    pub fn clear(&mut self) {
        self.connections.clear();
    }

    fn get_mut(&mut self, socket_id: SocketId) -> Result<&mut Connection> {
        self.connections
            .get_mut(&socket_id)
            .ok_or_else(|| Error::unknown_socket(socket_id))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn close_info(code: u16) -> CloseInfo {
        CloseInfo {
            was_clean: true,
            code,
            reason: "bye".to_string(),
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut registry = ConnectionRegistry::new();
        let id = SocketId::new(1);

        let created = registry.created(id, "ws://example.com/", "chat");
        assert_eq!(created.state, ConnectionState::Connecting);

        let opened = registry
            .opened(id, "wss://example.com/", "chat", "permessage-deflate")
            .expect("opened");
        assert!(opened.is_open());
        assert_eq!(opened.effective_uri.as_deref(), Some("wss://example.com/"));
        assert_eq!(registry.open_count(), 1);

        let closed = registry.closed(id, close_info(1000)).expect("closed");
        assert_eq!(closed.state, ConnectionState::Closed);
        assert_eq!(closed.close.as_ref().map(|c| c.code), Some(1000));
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn test_unknown_socket_errors() {
        let mut registry = ConnectionRegistry::new();
        let err = registry.closed(SocketId::new(9), close_info(1006)).unwrap_err();
        assert!(matches!(err, Error::UnknownSocket { .. }));
        assert!(registry.opened(SocketId::new(9), "", "", "").is_err());
    }

    #[test]
    fn test_record_frame() {
        let mut registry = ConnectionRegistry::new();
        let id = SocketId::new(2);
        registry.created(id, "ws://x/", "");

        assert!(registry.record_frame(id, Direction::Sent));
        assert!(registry.record_frame(id, Direction::Received));
        assert!(registry.record_frame(id, Direction::Received));
        assert!(!registry.record_frame(SocketId::new(3), Direction::Sent));

        let connection = registry.get(id).expect("tracked");
        assert_eq!(connection.frames_sent, 1);
        assert_eq!(connection.frames_received, 2);
    }

    #[test]
    fn test_recreate_replaces_entry() {
        let mut registry = ConnectionRegistry::new();
        let id = SocketId::new(1);
        registry.created(id, "ws://old/", "");
        registry.record_frame(id, Direction::Sent);

        let connection = registry.created(id, "ws://new/", "");
        assert_eq!(connection.uri, "ws://new/");
        assert_eq!(connection.frames_sent, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_connections_sorted_and_clear() {
        let mut registry = ConnectionRegistry::new();
        registry.created(SocketId::new(5), "ws://b/", "");
        registry.created(SocketId::new(2), "ws://a/", "");

        let ids: Vec<_> = registry.connections().iter().map(|c| c.socket_id).collect();
        assert_eq!(ids, vec![SocketId::new(2), SocketId::new(5)]);

        registry.clear();
        assert!(registry.is_empty());
    }
}
