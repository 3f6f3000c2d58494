//! Display helpers for the frame list.
//!
//! | Function | Example |
//! |----------|---------|
//! | [`format_size`] | `1536` → `"1.5 KB"` |
//! | [`format_time`] | `125_000` → `"2 m 5 s"` |
//! | [`format_clock`] | frame timestamp → `"13:5:9.42"` (local time) |
//! | [`format_clock_in`] | same, in an explicit time zone |
//! | [`crop_string`] | long payload → `"abc…xyz"` |

// ============================================================================
// Imports
// ============================================================================

use chrono::{DateTime, Local, TimeZone, Timelike};

// ============================================================================
// Constants
// ============================================================================

/// Payload preview length used by the frame list.
pub const PREVIEW_LIMIT: usize = 50;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

// ============================================================================
// Sizes & Durations
// ============================================================================

/// Formats a byte count.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b < KB => format!("{b} B"),
        b if b < MB => format!("{} KB", one_decimal(b as f64 / KB as f64)),
        b if b < GB => format!("{} MB", one_decimal(b as f64 / MB as f64)),
        b => format!("{} GB", one_decimal(b as f64 / GB as f64)),
    }
}

/// Formats a duration given in milliseconds.
#[must_use]
pub fn format_time(millis: u64) -> String {
    if millis < 1000 {
        return format!("{millis} ms");
    }
    if millis < 60_000 {
        return format!("{} s", one_decimal(millis as f64 / 1000.0));
    }
    let seconds = millis / 1000;
    format!("{} m {} s", seconds / 60, seconds % 60)
}

/// One decimal place, without a trailing `.0`.
fn one_decimal(value: f64) -> String {
    let rounded = format!("{value:.1}");
    match rounded.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => rounded,
    }
}

// ============================================================================
// Timestamps
// ============================================================================

/// Formats a frame timestamp (microseconds since the epoch) as local
/// `h:m:s.ms`, fields unpadded.
#[must_use]
pub fn format_clock(time_stamp: u64) -> String {
    format_clock_in(time_stamp, &Local)
}

/// Formats a frame timestamp in the given time zone.
///
/// Returns an empty string if the timestamp is out of range.
#[must_use]
pub fn format_clock_in<Tz: TimeZone>(time_stamp: u64, tz: &Tz) -> String {
    let Some(utc) = i64::try_from(time_stamp)
        .ok()
        .and_then(DateTime::from_timestamp_micros)
    else {
        return String::new();
    };

    let time = utc.with_timezone(tz);
    format!(
        "{}:{}:{}.{}",
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis()
    )
}

// ============================================================================
// Text
// ============================================================================

/// Shortens `text` to `limit` characters by replacing its middle with an
/// ellipsis. A zero limit leaves the text unchanged.
#[must_use]
pub fn crop_string(text: &str, limit: usize) -> String {
    let length = text.chars().count();
    if limit == 0 || length <= limit {
        return text.to_string();
    }

    let kept = limit - 1;
    let head = kept.div_ceil(2);
    let tail = kept / 2;

    let mut cropped: String = text.chars().take(head).collect();
    cropped.push('…');
    cropped.extend(text.chars().skip(length - tail));
    cropped
}

// ============================================================================
// Tests
// ============================================================================
