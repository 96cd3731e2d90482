//! Request-level availability across all of a user's calendars.
//!
//! Busy intervals are gathered from N calendar sources, each already
//! normalized to the request's display timezone, and fed through free-slot
//! derivation with the request's configuration. A source that fails is
//! omitted rather than failing the whole request: it simply contributes no
//! busy time.

use serde::{Deserialize, Serialize};

use crate::civil::{BusyInterval, DateRange, FreeSlot, Timezone};
use crate::config::AvailabilityConfig;
use crate::convert::convert_slots;
use crate::error::Result;
use crate::freeslots::derive_free_slots;

/// A date range plus the options to compute availability with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub range: DateRange,
    pub config: AvailabilityConfig,
}

impl AvailabilityRequest {
    pub fn new(range: DateRange, config: AvailabilityConfig) -> Self {
        Self { range, config }
    }

    /// Build a request from `YYYY-MM-DD` bounds, failing on malformed dates.
    pub fn parse(start_date: &str, end_date: &str, config: AvailabilityConfig) -> Result<Self> {
        Ok(Self {
            range: DateRange::parse(start_date, end_date)?,
            config,
        })
    }
}

/// Free slots for a request, tagged with the zone their civil readings are in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub timezone: Timezone,
    /// Ascending by date, then by start time.
    pub slots: Vec<FreeSlot>,
    /// Number of busy intervals considered.
    pub busy_count: usize,
}

impl Availability {
    /// Re-express the slots in another zone, splitting any that cross midnight there.
    pub fn in_timezone(&self, target: &Timezone) -> Availability {
        Availability {
            timezone: *target,
            slots: convert_slots(&self.slots, &self.timezone, target),
            busy_count: self.busy_count,
        }
    }
}

/// Compute the free slots for `request` given busy intervals in its display zone.
pub fn find_availability(busy: &[BusyInterval], request: &AvailabilityRequest) -> Availability {
    let config = &request.config;
    let slots = derive_free_slots(
        busy,
        &request.range,
        config.include_weekends,
        &config.window(),
        config.min_slot_minutes,
    );

    tracing::debug!(
        start = %request.range.start,
        end = %request.range.end,
        timezone = %config.timezone,
        busy = busy.len(),
        slots = slots.len(),
        "computed availability"
    );

    Availability {
        timezone: config.timezone,
        slots,
        busy_count: busy.len(),
    }
}

// ── Busy sources ────────────────────────────────────────────────────────────

/// A calendar that can report busy intervals for a date range.
///
/// Implementations return intervals already expressed in `zone`'s civil
/// calendar, with all-day and cancelled events left out.
pub trait BusySource {
    /// Opaque identifier for this source (e.g., "work-google", "personal-icloud").
    fn name(&self) -> &str;

    fn fetch(&self, range: &DateRange, zone: &Timezone) -> Result<Vec<BusyInterval>>;
}

/// An in-memory busy source, e.g. a calendar fetched ahead of time.
#[derive(Debug, Clone)]
pub struct BusyStream {
    pub stream_id: String,
    pub intervals: Vec<BusyInterval>,
}

impl BusyStream {
    pub fn new(stream_id: impl Into<String>, intervals: Vec<BusyInterval>) -> Self {
        Self {
            stream_id: stream_id.into(),
            intervals,
        }
    }
}

impl BusySource for BusyStream {
    fn name(&self) -> &str {
        &self.stream_id
    }

    /// Intervals dated inside `range`. The stream is assumed to already be in `zone`.
    fn fetch(&self, range: &DateRange, _zone: &Timezone) -> Result<Vec<BusyInterval>> {
        Ok(self
            .intervals
            .iter()
            .filter(|interval| range.contains(interval.date))
            .cloned()
            .collect())
    }
}

/// Gather busy intervals from every source, omitting sources that fail.
pub fn collect_busy(
    sources: &[Box<dyn BusySource>],
    range: &DateRange,
    zone: &Timezone,
) -> Vec<BusyInterval> {
    let mut busy = Vec::new();
    for source in sources {
        match source.fetch(range, zone) {
            Ok(intervals) => {
                tracing::debug!(source = source.name(), count = intervals.len(), "fetched busy intervals");
                busy.extend(intervals);
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "skipping unreadable busy source");
            }
        }
    }
    busy
}
