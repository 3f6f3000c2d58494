//! Per-tab session state.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`FrameLog`] | Bounded, ordered log of classified frames |
//! | [`FrameFilter`] | Search and selection over the log |
//! | [`ConnectionRegistry`] | WebSocket lifecycle tracking |
//! | [`Session`] | Applies backend events to all of the above |

// ============================================================================
// Submodules
// ============================================================================

/// Event ingestion.
pub mod core;

/// Frame filtering.
pub mod filter;

/// Frame log.
pub mod log;

/// Connection registry.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use core::Session;
pub use filter::{FilteredFrames, FrameFilter};
pub use log::{DEFAULT_MAX_FRAMES, FrameLog};
pub use registry::{CloseInfo, Connection, ConnectionRegistry, ConnectionState};
