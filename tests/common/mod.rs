//! Shared utilities for integration tests.

#![allow(dead_code)]

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use websocket_monitor::Direction;

// ============================================================================
// Functions
// ============================================================================

/// Initialize tracing for a test binary.
///
/// Honors `RUST_LOG`, defaulting to `websocket_monitor=debug`. Safe to call
/// from every test.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("websocket_monitor=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Builds a backend frame event.
pub fn frame_event(direction: Direction, socket_id: u32, time_stamp: u64, payload: &str) -> Value {
    let kind = match direction {
        Direction::Sent => "frameSent",
        Direction::Received => "frameReceived",
    };
    json!({
        "type": kind,
        "webSocketSerialID": socket_id,
        "data": {
            "timeStamp": time_stamp,
            "finBit": true,
            "opCode": 1,
            "maskBit": direction == Direction::Sent,
            "payload": payload,
        }
    })
}

/// Builds a backend frame event as JSON text.
pub fn frame_event_json(
    direction: Direction,
    socket_id: u32,
    time_stamp: u64,
    payload: &str,
) -> String {
    frame_event(direction, socket_id, time_stamp, payload).to_string()
}
