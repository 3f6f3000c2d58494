//! Message types exchanged with the monitor's collaborators.
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`Event`] | Backend → Monitor | Raw WebSocket lifecycle or frame notification |
//! | [`BackendEvent`] | Backend → Monitor | Typed form of [`Event`] |
//! | [`ViewMessage`] | Monitor → View | Update for the frame list UI |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `event` | Backend events and their typed parse |
//! | `view` | Updates for the rendering collaborator |

// ============================================================================
// Submodules
// ============================================================================

/// Backend event message types.
pub mod event;

/// View update message types.
pub mod view;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{BackendEvent, Event};
pub use view::ViewMessage;
