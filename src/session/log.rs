//! Bounded frame log.
//!
//! Frames are kept in arrival order. When the log is full the oldest
//! frame is evicted; the summary keeps counting evicted frames so the view
//! can report how many were dropped.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::classifier::Classification;
use crate::frame::{CapturedFrame, ConnectionSummary, Frame};
use crate::identifiers::FrameId;

use super::filter::{FilteredFrames, FrameFilter};

// ============================================================================
// Constants
// ============================================================================

/// Default number of frames kept before eviction.
pub const DEFAULT_MAX_FRAMES: usize = 5000;

// ============================================================================
// FrameLog
// ============================================================================

/// Frames of the inspected tab, oldest first.
#[derive(Debug)]
pub struct FrameLog {
    /// Retained frames.
    frames: VecDeque<Frame>,
    /// Capacity, at least 1.
    max_frames: usize,
    /// Id for the next frame.
    next_id: FrameId,
    /// Summary over every frame appended since the last clear.
    summary: ConnectionSummary,
    /// Timestamp of the last appended frame.
    last_time_stamp: Option<u64>,
}

impl Default for FrameLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAMES)
    }
}

impl FrameLog {
    /// Creates a log holding at most `max_frames` frames (minimum 1).
    #[must_use]
    pub fn new(max_frames: usize) -> Self {
        let max_frames = max_frames.max(1);
        Self {
            frames: VecDeque::with_capacity(max_frames.min(1024)),
            max_frames,
            next_id: FrameId::new(1),
            summary: ConnectionSummary::default(),
            last_time_stamp: None,
        }
    }

    /// Appends a classified frame and returns it.
    ///
    /// Assigns the next frame id, clamps a timestamp that goes backwards
    /// to the previous one, and evicts the oldest frame when full.
    pub fn push(&mut self, mut captured: CapturedFrame, classification: Classification) -> &Frame {
        if let Some(last) = self.last_time_stamp
            && captured.data.time_stamp < last
        {
            debug!(
                time_stamp = captured.data.time_stamp,
                last, "Frame timestamp went backwards, clamping"
            );
            captured.data.time_stamp = last;
        }
        self.last_time_stamp = Some(captured.data.time_stamp);
        self.summary.record(&captured.data);

        while self.frames.len() >= self.max_frames {
            if let Some(evicted) = self.frames.pop_front() {
                trace!(frame_id = %evicted.id, "Evicted oldest frame");
            }
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.frames.push_back(Frame::new(id, captured, classification));

        &self.frames[self.frames.len() - 1]
    }

    /// Returns a retained frame by id.
    #[must_use]
    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        self.frames
            .binary_search_by_key(&id, |frame| frame.id)
            .ok()
            .map(|index| &self.frames[index])
    }

    /// Iterates over retained frames, oldest first.
    #[inline]
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Returns the most recent frame.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Frame> {
        self.frames.back()
    }

    /// Number of retained frames.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame is retained.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Capacity of the log.
    #[inline]
    #[must_use]
    pub const fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Summary over every frame appended since the last clear.
    #[inline]
    #[must_use]
    pub const fn summary(&self) -> ConnectionSummary {
        self.summary
    }

    /// Number of frames evicted since the last clear.
    #[inline]
    #[must_use]
    pub fn removed_frames(&self) -> u64 {
        self.summary.frame_count - self.frames.len() as u64
    }

    /// Returns the retained frames matching `filter` and their summary.
    #[must_use]
    pub fn filter(&self, filter: &FrameFilter) -> FilteredFrames {
        let frames: Vec<Frame> = self
            .frames
            .iter()
            .filter(|frame| filter.matches(frame))
            .cloned()
            .collect();
        let summary = ConnectionSummary::from_frames(&frames);

        FilteredFrames { frames, summary }
    }

    /// Returns every retained frame with the log summary.
    #[must_use]
    pub fn snapshot(&self) -> FilteredFrames {
        FilteredFrames {
            frames: self.frames.iter().cloned().collect(),
            summary: self.summary,
        }
    }

    /// Drops all frames and resets the summary.
    ///
    /// Frame ids keep increasing across clears.
    pub fn clear(&mut self) {
        debug!(frames = self.frames.len(), "Clearing frame log");
        self.frames.clear();
        self.summary = ConnectionSummary::default();
        self.last_time_stamp = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
