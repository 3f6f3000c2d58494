//! Synchronous ingestion core.
//!
//! A [`Session`] turns backend events into frame log and registry updates
//! and produces the [`ViewMessage`] the rendering side should receive.
//! It owns no threads; the [`Monitor`](crate::Monitor) drives it from its
//! event loop, but it can also be fed directly.
//!
//! Ingestion is split in two steps so callers sharing a session behind a
//! lock can classify under a read guard:
//!
//! | Step | Receiver | Work |
//! |------|----------|------|
//! | [`Session::classify_event`] | `&self` | Runs the decoders on a frame payload |
//! | [`Session::apply`] | `&mut self` | Updates the log and registry |
//!
//! [`Session::handle`] performs both.

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, trace};

use crate::classifier::{Classification, Classifier};
use crate::error::Result;
use crate::frame::{CapturedFrame, Direction, Frame};
use crate::options::MonitorOptions;
use crate::protocol::{BackendEvent, ViewMessage};

use super::filter::{FilteredFrames, FrameFilter};
use super::log::FrameLog;
use super::registry::ConnectionRegistry;

// ============================================================================
// Session
// ============================================================================

/// Frame log, connection registry and classifier of one inspected tab.
#[derive(Debug)]
pub struct Session {
    classifier: Classifier,
    log: FrameLog,
    registry: ConnectionRegistry,
    paused: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&MonitorOptions::default())
    }
}

impl Session {
    /// Creates a session configured by `options`.
    #[must_use]
    pub fn new(options: &MonitorOptions) -> Self {
        Self {
            classifier: Classifier::with_protocols(&options.protocols),
            log: FrameLog::new(options.max_frames),
            registry: ConnectionRegistry::new(),
            paused: options.paused,
        }
    }

    /// Classifies and applies one backend event.
    ///
    /// Returns the view update to forward, or `None` when the event is not
    /// shown (paused frames, message-available notifications, unknown
    /// events).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownSocket`] when a close refers to a
    /// socket that was never seen.
    pub fn handle(&mut self, event: BackendEvent) -> Result<Option<ViewMessage>> {
        let classification = self.classify_event(&event);
        self.apply(event, classification)
    }

    /// Classifies the payload of a frame event.
    ///
    /// Returns `None` for events that carry no frame and while capture is
    /// paused.
    #[must_use]
    pub fn classify_event(&self, event: &BackendEvent) -> Option<Classification> {
        if self.paused {
            return None;
        }
        event
            .frame()
            .map(|captured| self.classifier.classify(&captured.data.payload))
    }

    /// Applies one backend event.
    ///
    /// `classification` is the result of [`classify_event`](Self::classify_event)
    /// for the same event. A frame event without one is classified here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownSocket`] when a close refers to a
    /// socket that was never seen.
    pub fn apply(
        &mut self,
        event: BackendEvent,
        classification: Option<Classification>,
    ) -> Result<Option<ViewMessage>> {
        let message = match event {
            BackendEvent::WebSocketCreated {
                socket_id,
                uri,
                protocols,
            } => {
                let connection = self.registry.created(socket_id, &uri, &protocols);
                Some(ViewMessage::WebSocketCreated(connection.clone()))
            }

            BackendEvent::WebSocketOpened {
                socket_id,
                effective_uri,
                protocols,
                extensions,
            } => {
                if self.registry.get(socket_id).is_none() {
                    debug!(%socket_id, "Opened socket was created before attach, registering");
                    self.registry.created(socket_id, &effective_uri, &protocols);
                }
                let connection = self
                    .registry
                    .opened(socket_id, &effective_uri, &protocols, &extensions)?;
                Some(ViewMessage::WebSocketOpened(connection.clone()))
            }

            BackendEvent::WebSocketClosed { socket_id, close } => {
                let connection = self.registry.closed(socket_id, close)?;
                Some(ViewMessage::WebSocketClosed(connection.clone()))
            }

            BackendEvent::WebSocketMessageAvailable {
                socket_id,
                message_type,
                ..
            } => {
                trace!(%socket_id, message_type, "Message available");
                None
            }

            BackendEvent::FrameReceived(captured) => self
                .record(captured, classification)
                .map(ViewMessage::FrameReceived),

            BackendEvent::FrameSent(captured) => self
                .record(captured, classification)
                .map(ViewMessage::FrameSent),

            BackendEvent::TabNavigated => {
                debug!("Tab navigated, resetting session");
                self.log.clear();
                self.registry.clear();
                Some(ViewMessage::TabNavigated)
            }

            BackendEvent::Unknown { event_type, .. } => {
                debug!(event_type, "Ignoring unknown backend event");
                None
            }
        };

        Ok(message)
    }

    /// Stores a frame unless paused.
    fn record(
        &mut self,
        captured: CapturedFrame,
        classification: Option<Classification>,
    ) -> Option<Frame> {
        if self.paused {
            trace!(socket_id = %captured.socket_id, "Paused, dropping frame");
            return None;
        }

        let classification = classification
            .unwrap_or_else(|| self.classifier.classify(&captured.data.payload));
        let direction = Direction::from_sent(captured.sent);
        if !self.registry.record_frame(captured.socket_id, direction) {
            trace!(socket_id = %captured.socket_id, "Frame for untracked socket");
        }

        let frame = self.log.push(captured, classification);
        trace!(
            frame_id = %frame.id,
            protocols = ?frame.classification.protocols(),
            "Frame logged"
        );
        Some(frame.clone())
    }

    /// Pauses or resumes frame capture.
    pub fn set_paused(&mut self, paused: bool) {
        debug!(paused, "Frame capture toggled");
        self.paused = paused;
    }

    /// Returns `true` while frames are being dropped.
    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Clears the frame log. Tracked sockets are kept.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Frames matching `filter`.
    #[must_use]
    pub fn filter(&self, filter: &FrameFilter) -> FilteredFrames {
        self.log.filter(filter)
    }

    /// Frame log.
    #[inline]
    #[must_use]
    pub const fn log(&self) -> &FrameLog {
        &self.log
    }

    /// Connection registry.
    #[inline]
    #[must_use]
    pub const fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Classifier used for incoming frames.
    #[inline]
    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Protocol;
    use crate::error::Error;
    use crate::frame::FrameData;
    use crate::identifiers::SocketId;
    use crate::session::CloseInfo;

    fn created(id: u32) -> BackendEvent {
        BackendEvent::WebSocketCreated {
            socket_id: SocketId::new(id),
            uri: "ws://example.com/socket".to_string(),
            protocols: String::new(),
        }
    }

    fn received(id: u32, payload: &str, time_stamp: u64) -> BackendEvent {
        BackendEvent::FrameReceived(CapturedFrame::new(
            SocketId::new(id),
            false,
            FrameData::text(payload, time_stamp),
        ))
    }

    #[test]
    fn test_frame_is_classified_and_logged() {
        let mut session = Session::default();
        session.handle(created(1)).expect("created");

        let message = session
            .handle(received(1, r#"42["chat","hi"]"#, 10))
            .expect("frame")
            .expect("view message");

        let frame = message.frame().expect("frame message");
        assert!(frame.classification.has(Protocol::SocketIo));
        assert_eq!(session.log().len(), 1);

        let connection = session.registry().get(SocketId::new(1)).expect("tracked");
        assert_eq!(connection.frames_received, 1);
    }

    #[test]
    fn test_paused_drops_frames() {
        let mut session = Session::new(&MonitorOptions::new().with_paused(true));
        assert!(session.is_paused());
        assert!(session.handle(received(1, "o", 1)).expect("ok").is_none());
        assert!(session.log().is_empty());

        session.set_paused(false);
        assert!(session.handle(received(1, "o", 2)).expect("ok").is_some());
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_open_before_create_registers_socket() {
        let mut session = Session::default();
        let message = session
            .handle(BackendEvent::WebSocketOpened {
                socket_id: SocketId::new(4),
                effective_uri: "wss://x/".to_string(),
                protocols: "wamp.2.json".to_string(),
                extensions: String::new(),
            })
            .expect("opened");

        match message {
            Some(ViewMessage::WebSocketOpened(connection)) => {
                assert!(connection.is_open());
                assert_eq!(connection.uri, "wss://x/");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_close_unknown_socket_is_error() {
        let mut session = Session::default();
        let result = session.handle(BackendEvent::WebSocketClosed {
            socket_id: SocketId::new(8),
            close: CloseInfo {
                was_clean: false,
                code: 1006,
                reason: String::new(),
            },
        });
        assert!(matches!(result, Err(Error::UnknownSocket { .. })));
    }

    #[test]
    fn test_tab_navigated_resets() {
        let mut session = Session::default();
        session.handle(created(1)).expect("created");
        session.handle(received(1, "h", 1)).expect("frame");

        let message = session.handle(BackendEvent::TabNavigated).expect("navigated");
        assert_eq!(message, Some(ViewMessage::TabNavigated));
        assert!(session.log().is_empty());
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_disabled_protocol_not_attached() {
        let options = MonitorOptions::new().with_protocols([Protocol::Json]);
        let mut session = Session::new(&options);
        let message = session
            .handle(received(1, "[48,1,{},\"p\"]", 1))
            .expect("frame")
            .expect("view message");
        let frame = message.frame().expect("frame");
        assert!(frame.classification.wamp.is_none());
        assert!(frame.classification.json.is_some());
    }

    #[test]
    fn test_classify_event_is_read_only() {
        let session = Session::default();
        let classification = session
            .classify_event(&received(1, r#"{"price":1}"#, 1))
            .expect("frame event");
        assert!(classification.has(Protocol::Json));
        assert!(session.log().is_empty());

        assert!(session.classify_event(&created(1)).is_none());
        let navigated = BackendEvent::TabNavigated;
        assert!(session.classify_event(&navigated).is_none());
    }

    #[test]
    fn test_classify_event_skips_paused() {
        let session = Session::new(&MonitorOptions::new().with_paused(true));
        assert!(session.classify_event(&received(1, "o", 1)).is_none());
    }

    #[test]
    fn test_apply_keeps_supplied_classification() {
        let json_only = Classifier::with_protocols(&[Protocol::Json]);
        let classification = json_only.classify("[48,1,{},\"p\"]");

        let mut session = Session::default();
        let message = session
            .apply(received(1, "[48,1,{},\"p\"]", 1), Some(classification))
            .expect("frame")
            .expect("view message");
        let frame = message.frame().expect("frame");
        assert!(frame.classification.wamp.is_none());
        assert!(frame.classification.json.is_some());
    }

    #[test]
    fn test_apply_without_classification_classifies() {
        let mut session = Session::default();
        let message = session
            .apply(received(1, "o", 1), None)
            .expect("frame")
            .expect("view message");
        let frame = message.frame().expect("frame");
        assert!(frame.classification.has(Protocol::SockJs));
    }

    #[test]
    fn test_unknown_and_message_available_are_silent() {
        let mut session = Session::default();
        let unknown = BackendEvent::Unknown {
            event_type: "custom".to_string(),
            params: serde_json::Value::Null,
        };
        assert!(session.handle(unknown).expect("ok").is_none());

        let available = BackendEvent::WebSocketMessageAvailable {
            socket_id: SocketId::new(1),
            data: "x".to_string(),
            message_type: 1,
        };
        assert!(session.handle(available).expect("ok").is_none());
    }
}
