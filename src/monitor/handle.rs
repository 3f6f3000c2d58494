//! Monitor entry point and handle.
//!
//! # Example
//!
//! ```
//! use websocket_monitor::{Monitor, MonitorOptions, ViewMessage};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> websocket_monitor::Result<()> {
//! let (handle, mut updates) = Monitor::spawn(MonitorOptions::new())?;
//!
//! handle.ingest_json(r#"{"type":"webSocketCreated","webSocketSerialID":1,"uri":"ws://x/"}"#)?;
//! handle.ingest_json(
//!     r#"{"type":"frameReceived","webSocketSerialID":1,"data":{"timeStamp":1,"payload":"o"}}"#,
//! )?;
//!
//! assert!(matches!(updates.recv().await, Some(ViewMessage::WebSocketCreated(_))));
//! let update = updates.recv().await.expect("frame update");
//! assert!(update.frame().is_some_and(|f| f.classification.sock_js.is_some()));
//!
//! handle.shutdown();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::SocketId;
use crate::options::MonitorOptions;
use crate::protocol::{BackendEvent, Event, ViewMessage};
use crate::session::{Connection, FilteredFrames, FrameFilter, Session};

use super::event_loop::{self, MonitorCommand};

// ============================================================================
// Monitor
// ============================================================================

/// Spawns monitors.
#[derive(Debug)]
pub struct Monitor;

impl Monitor {
    /// Validates `options` and starts a monitor task.
    ///
    /// Returns the handle and the receiver of view updates. The receiver
    /// buffers up to [`MonitorOptions::view_capacity`] updates; further
    /// updates are dropped until it is drained. Must be called from within
    /// a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the options are invalid.
    pub fn spawn(options: MonitorOptions) -> Result<(MonitorHandle, mpsc::Receiver<ViewMessage>)> {
        options.validate()?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = mpsc::channel(options.view_capacity);
        let session = Arc::new(RwLock::new(Session::new(&options)));

        tokio::spawn(event_loop::run(command_rx, Arc::clone(&session), view_tx));

        debug!(
            max_frames = options.max_frames,
            view_capacity = options.view_capacity,
            protocols = ?options.protocols,
            "Monitor spawned"
        );

        Ok((
            MonitorHandle {
                command_tx,
                session,
            },
            view_rx,
        ))
    }
}

// ============================================================================
// MonitorHandle
// ============================================================================

/// Handle to a running monitor.
///
/// Commands are applied in the order they are sent. Reads observe the
/// state after every command the loop has processed so far; call
/// [`flush`](Self::flush) first to include everything sent before.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    /// Channel to the event loop.
    command_tx: mpsc::UnboundedSender<MonitorCommand>,
    /// Session state (written by the event loop only).
    session: Arc<RwLock<Session>>,
}

// ============================================================================
// MonitorHandle - Commands
// ============================================================================

impl MonitorHandle {
    /// Queues a backend event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorClosed`] if the event loop has stopped.
    pub fn dispatch(&self, event: BackendEvent) -> Result<()> {
        self.send(MonitorCommand::Dispatch(event))
    }

    /// Parses backend JSON and queues the event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] or [`Error::InvalidEvent`] if the text is not
    /// a valid event, or [`Error::MonitorClosed`] if the loop has stopped.
    pub fn ingest_json(&self, text: &str) -> Result<()> {
        let event = Event::from_json(text)?.parse()?;
        self.dispatch(event)
    }

    /// Pauses or resumes frame capture.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorClosed`] if the event loop has stopped.
    pub fn set_paused(&self, paused: bool) -> Result<()> {
        self.send(MonitorCommand::SetPaused(paused))
    }

    /// Clears the frame log.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorClosed`] if the event loop has stopped.
    pub fn clear(&self) -> Result<()> {
        self.send(MonitorCommand::Clear)
    }

    /// Waits until every command sent before this call has been applied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MonitorClosed`] if the event loop has stopped.
    pub async fn flush(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(MonitorCommand::Flush(ack_tx))?;
        ack_rx.await.map_err(|_| Error::MonitorClosed)
    }

    /// Stops the event loop. Later commands fail with
    /// [`Error::MonitorClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(MonitorCommand::Shutdown);
    }

    /// Returns `true` once the event loop has stopped.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    fn send(&self, command: MonitorCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::MonitorClosed)
    }
}

// ============================================================================
// MonitorHandle - Reads
// ============================================================================

impl MonitorHandle {
    /// Returns every retained frame with the log summary.
    #[must_use]
    pub fn snapshot(&self) -> FilteredFrames {
        self.session.read().log().snapshot()
    }

    /// Returns the retained frames matching `filter`.
    #[must_use]
    pub fn filter(&self, filter: &FrameFilter) -> FilteredFrames {
        self.session.read().filter(filter)
    }

    /// Number of frames evicted since the last clear.
    #[must_use]
    pub fn removed_frames(&self) -> u64 {
        self.session.read().log().removed_frames()
    }

    /// Returns `true` while frames are being dropped.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.session.read().is_paused()
    }

    /// Returns a tracked socket.
    #[must_use]
    pub fn connection(&self, socket_id: SocketId) -> Option<Connection> {
        self.session.read().registry().get(socket_id).cloned()
    }

    /// Returns all tracked sockets ordered by serial id.
    #[must_use]
    pub fn connections(&self) -> Vec<Connection> {
        self.session
            .read()
            .registry()
            .connections()
            .into_iter()
            .cloned()
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
