//! End-to-end monitor scenarios driven by backend JSON.

mod common;

use anyhow::Result;
use serde_json::json;
use websocket_monitor::{
    ConnectionState, Direction, FrameFilter, Monitor, MonitorOptions, Protocol, SocketId,
    ViewMessage,
};

#[tokio::test]
async fn test_socket_lifecycle_and_frames() -> Result<()> {
    common::init_logging();

    let (handle, mut updates) = Monitor::spawn(MonitorOptions::new())?;

    let uri = "ws://chat.test/socket.io/";
    let events = [
        json!({"type": "webSocketCreated", "webSocketSerialID": 7, "uri": uri}),
        json!({"type": "webSocketOpened", "webSocketSerialID": 7, "effectiveURI": uri}),
        common::frame_event(Direction::Sent, 7, 100, r#"42["join","lobby"]"#),
        common::frame_event(Direction::Received, 7, 200, r#"43[{"ok":true}]"#),
        json!({"type": "webSocketClosed", "webSocketSerialID": 7, "wasClean": true, "code": 1000}),
    ];
    for event in &events {
        handle.ingest_json(&event.to_string())?;
    }
    handle.flush().await?;

    let mut kinds = Vec::new();
    while let Ok(update) = updates.try_recv() {
        let value = serde_json::to_value(&update)?;
        kinds.extend(value["type"].as_str().map(str::to_string));
    }
    let expected = [
        "webSocketCreated",
        "webSocketOpened",
        "frameSent",
        "frameReceived",
        "webSocketClosed",
    ];
    assert_eq!(kinds, expected);

    let connection = handle.connection(SocketId::new(7)).expect("tracked socket");
    assert_eq!(connection.state, ConnectionState::Closed);
    assert_eq!(connection.frames_sent, 1);
    assert_eq!(connection.frames_received, 1);

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.frames.len(), 2);
    assert_eq!(snapshot.summary.frame_count, 2);
    assert_eq!(snapshot.summary.duration_micros(), 100);
    for frame in &snapshot.frames {
        assert!(frame.classification.has(Protocol::SocketIo));
    }

    handle.shutdown();
    Ok(())
}

#[tokio::test]
async fn test_filter_and_eviction() -> Result<()> {
    common::init_logging();

    let (handle, _updates) = Monitor::spawn(MonitorOptions::new().with_max_frames(3))?;
    let payloads = ["o", "h", r#"a["{\"n\":1}"]"#, "[48,1,{},\"echo\"]", "plain text"];
    for (i, payload) in payloads.iter().enumerate() {
        let direction = Direction::from_sent(i % 2 == 1);
        handle.ingest_json(&common::frame_event_json(direction, 1, i as u64, payload))?;
    }
    handle.flush().await?;

    assert_eq!(handle.snapshot().frames.len(), 3);
    assert_eq!(handle.removed_frames(), 2);

    let wamp = handle.filter(&FrameFilter::new().with_protocol(Protocol::Wamp));
    assert_eq!(wamp.frames.len(), 1);
    assert_eq!(wamp.frames[0].direction(), Direction::Sent);

    let text = handle.filter(&FrameFilter::new().with_text("PLAIN")?);
    assert_eq!(text.frames.len(), 1);
    assert!(text.frames[0].classification.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_tab_navigation_resets_state() -> Result<()> {
    let (handle, mut updates) = Monitor::spawn(MonitorOptions::new())?;

    handle.ingest_json(r#"{"type":"webSocketCreated","webSocketSerialID":1,"uri":"ws://a/"}"#)?;
    handle.ingest_json(&common::frame_event_json(Direction::Received, 1, 1, "h"))?;
    handle.ingest_json(r#"{"type":"tabNavigated"}"#)?;
    handle.flush().await?;

    assert!(handle.snapshot().frames.is_empty());
    assert!(handle.connections().is_empty());

    let mut last = None;
    while let Ok(update) = updates.try_recv() {
        last = Some(update);
    }
    assert_eq!(last, Some(ViewMessage::TabNavigated));
    Ok(())
}
