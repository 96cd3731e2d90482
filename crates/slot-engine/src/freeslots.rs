//! Derive free slots from busy intervals, day by day, inside a working window.
//!
//! For every retained date in the requested range, busy intervals reported on
//! that date are clipped to the working window, merged, and the gaps between
//! merged blocks that meet the minimum duration become free slots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::civil::{deserialize_start, BusyInterval, CivilDate, CivilTime, DateRange, FreeSlot};
use crate::error::Result;
use crate::merge::{merge, MinuteRange};

/// Gaps shorter than this are not actionable and are dropped.
pub const DEFAULT_MIN_SLOT_MINUTES: u16 = 15;

/// The daily `[start, end)` range within which availability is computed.
///
/// Time outside the window is neither busy nor free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    #[serde(deserialize_with = "deserialize_start")]
    pub start: CivilTime,
    pub end: CivilTime,
}

impl WorkingWindow {
    pub const FULL_DAY: WorkingWindow = WorkingWindow {
        start: CivilTime::MIDNIGHT,
        end: CivilTime::END_OF_DAY,
    };

    pub fn new(start: CivilTime, end: CivilTime) -> Self {
        Self { start, end }
    }

    /// Build a window from `HH:MM` strings (`24:00` is accepted as the end only).
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: CivilTime::parse_start(start)?,
            end: CivilTime::parse(end)?,
        })
    }

    pub fn start_minute(&self) -> u16 {
        self.start.minutes()
    }

    pub fn end_minute(&self) -> u16 {
        self.end.minutes()
    }

    /// Clip `[start, end)` to the window, or `None` if nothing is left.
    pub fn clip(&self, start: CivilTime, end: CivilTime) -> Option<MinuteRange> {
        let start = start.minutes().max(self.start_minute());
        let end = end.minutes().min(self.end_minute());
        (start < end).then(|| MinuteRange::new(start, end))
    }
}

impl Default for WorkingWindow {
    fn default() -> Self {
        Self::FULL_DAY
    }
}

/// Derive the free slots of every retained day in `range`.
///
/// Saturdays and Sundays are skipped unless `include_weekends` is set. Days
/// with no busy intervals are free for the whole window. Slots come out grouped
/// by date in calendar order and ascending by start within a date.
///
/// An inverted `range` or an empty window yields no slots.
pub fn derive_free_slots(
    busy: &[BusyInterval],
    range: &DateRange,
    include_weekends: bool,
    window: &WorkingWindow,
    min_slot_minutes: u16,
) -> Vec<FreeSlot> {
    let mut by_date: HashMap<CivilDate, Vec<MinuteRange>> = HashMap::new();
    for interval in busy {
        if let Some(clipped) = window.clip(interval.start, interval.end) {
            by_date.entry(interval.date).or_default().push(clipped);
        }
    }

    let mut slots = Vec::new();
    for date in range.days() {
        if !include_weekends && date.is_weekend() {
            continue;
        }

        let blocks = by_date
            .get(&date)
            .map(|ranges| merge(ranges))
            .unwrap_or_default();
        let gaps = free_ranges(&blocks, window, min_slot_minutes);

        tracing::debug!(
            date = %date,
            busy_blocks = blocks.len(),
            free_slots = gaps.len(),
            "derived free slots for day"
        );

        slots.extend(gaps.into_iter().map(|gap| {
            FreeSlot::new(
                date,
                CivilTime::saturating_from_minutes(gap.start),
                CivilTime::saturating_from_minutes(gap.end),
            )
        }));
    }

    slots
}

/// Gaps between merged busy blocks within the window, at least `min_slot_minutes` wide.
///
/// `blocks` must be the sorted, non-overlapping output of [`merge`], already
/// clipped to the window.
pub fn free_ranges(
    blocks: &[MinuteRange],
    window: &WorkingWindow,
    min_slot_minutes: u16,
) -> Vec<MinuteRange> {
    let mut gaps = Vec::new();
    let mut cursor = window.start_minute();

    for block in blocks {
        if block.start > cursor {
            let gap = MinuteRange::new(cursor, block.start);
            if gap.width() >= min_slot_minutes {
                gaps.push(gap);
            }
        }
        cursor = cursor.max(block.end);
    }

    // Trailing gap after the last busy block.
    if cursor < window.end_minute() {
        let gap = MinuteRange::new(cursor, window.end_minute());
        if gap.width() >= min_slot_minutes {
            gaps.push(gap);
        }
    }

    gaps
}
