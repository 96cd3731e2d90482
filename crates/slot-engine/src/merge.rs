//! Merge overlapping or touching minute ranges on a single day's axis.
//!
//! Ranges are sorted by start, then swept left to right. A range whose start is
//! at or before the current merged range's end extends it, so ranges that only
//! touch (`next.start == current.end`) merge too.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` range in minutes since midnight (0–1440).
///
/// Callers construct ranges with `start < end`; zero-width ranges are dropped
/// before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MinuteRange {
    pub start: u16,
    pub end: u16,
}

impl MinuteRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }
}

/// Merge ranges into the minimal sorted set of non-overlapping, non-touching ranges.
///
/// Input order does not matter. Every minute covered by an input range is
/// covered by exactly one output range, and consecutive outputs are separated
/// by at least one uncovered minute.
pub fn merge(ranges: &[MinuteRange]) -> Vec<MinuteRange> {
    if ranges.is_empty() {
        return Vec::new();
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_unstable_by_key(|r| (r.start, r.end));

    let mut merged: Vec<MinuteRange> = Vec::with_capacity(sorted.len());
    for range in sorted {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}
