//! Monitor event loop.
//!
//! The loop owns the write side of the session: every backend event is
//! applied in arrival order, so each frame is classified exactly once and
//! ids follow arrival order.
//!
//! Frame payloads are classified under a read guard. The write guard is
//! only held to append the result, so handle reads never wait on decoding.
//!
//! View updates go through a bounded channel. When the consumer falls
//! behind, new updates are dropped; the session state is unaffected.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use crate::protocol::{BackendEvent, ViewMessage};
use crate::session::Session;

// ============================================================================
// MonitorCommand
// ============================================================================

/// Commands for the event loop.
pub(crate) enum MonitorCommand {
    /// Apply a backend event.
    Dispatch(BackendEvent),
    /// Pause or resume frame capture.
    SetPaused(bool),
    /// Clear the frame log.
    Clear,
    /// Acknowledge once every earlier command has been applied.
    Flush(oneshot::Sender<()>),
    /// Stop the loop.
    Shutdown,
}

// ============================================================================
// Event Loop
// ============================================================================

/// Applies commands to the session until shutdown or until every handle
/// is dropped.
pub(crate) async fn run(
    mut command_rx: mpsc::UnboundedReceiver<MonitorCommand>,
    session: Arc<RwLock<Session>>,
    view_tx: mpsc::Sender<ViewMessage>,
) {
    loop {
        match command_rx.recv().await {
            Some(MonitorCommand::Dispatch(event)) => {
                let classification = session.read().classify_event(&event);
                let result = session.write().apply(event, classification);
                match result {
                    Ok(Some(message)) => forward(&view_tx, message),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Failed to apply backend event"),
                }
            }

            Some(MonitorCommand::SetPaused(paused)) => {
                session.write().set_paused(paused);
            }

            Some(MonitorCommand::Clear) => {
                session.write().clear();
                forward(&view_tx, ViewMessage::Cleared);
            }

            Some(MonitorCommand::Flush(ack_tx)) => {
                let _ = ack_tx.send(());
            }

            Some(MonitorCommand::Shutdown) => {
                debug!("Shutdown command received");
                break;
            }

            None => {
                debug!("Command channel closed");
                break;
            }
        }
    }

    debug!("Monitor event loop terminated");
}

/// Sends a view update without waiting on the consumer.
fn forward(view_tx: &mpsc::Sender<ViewMessage>, message: ViewMessage) {
    match view_tx.try_send(message) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => debug!("View channel full, update dropped"),
        Err(TrySendError::Closed(_)) => trace!("View receiver dropped, update discarded"),
    }
}
