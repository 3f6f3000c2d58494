//! Background frame monitor.
//!
//! A [`Monitor`] runs the ingestion [`Session`](crate::Session) on a tokio
//! task. Backend events go in through a [`MonitorHandle`]; view updates
//! come out of the returned receiver.
//!
//! ```text
//! ┌──────────────┐  MonitorCommand   ┌──────────────┐   ViewMessage   ┌──────────┐
//! │ MonitorHandle│──────────────────►│  event loop  │────────────────►│   view   │
//! │  (cloneable) │◄── RwLock reads ──│   Session    │                 │          │
//! └──────────────┘                   └──────────────┘                 └──────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `handle` | [`Monitor`] and [`MonitorHandle`] |
//! | `event_loop` | Command processing task |

// ============================================================================
// Submodules
// ============================================================================

/// Command processing task.
mod event_loop;

/// Monitor entry point and handle.
pub mod handle;

// ============================================================================
// Re-exports
// ============================================================================

pub use handle::{Monitor, MonitorHandle};
