//! # slot-engine
//!
//! Deterministic free-slot computation across calendars and timezones.
//!
//! Given the busy intervals of every calendar a user controls (already
//! normalized to one display timezone), the engine derives the free windows
//! inside a daily working window and re-expresses them in any other IANA
//! timezone, splitting slots that cross local midnight.
//!
//! ## Modules
//!
//! - [`civil`] — Civil date/time value types, busy intervals and free slots
//! - [`merge`] — Merge overlapping or touching minute ranges
//! - [`freeslots`] — Derive free slots per day within a working window
//! - [`convert`] — Resolve wall-clock readings to instants and re-render them in another zone
//! - [`config`] — Request configuration (display zone, working hours, weekends, minimum slot)
//! - [`availability`] — Request-level entry point and busy-source fan-in
//! - [`error`] — Error types

pub mod availability;
pub mod civil;
pub mod config;
pub mod convert;
pub mod error;
pub mod freeslots;
pub mod merge;

pub use availability::{
    collect_busy, find_availability, Availability, AvailabilityRequest, BusySource, BusyStream,
};
pub use civil::{BusyInterval, CivilDate, CivilTime, DateRange, FreeSlot, Timezone};
pub use config::AvailabilityConfig;
pub use convert::{convert_slots, render_in_timezone, resolve_instant, utc_literal};
pub use error::SlotError;
pub use freeslots::{derive_free_slots, free_ranges, WorkingWindow, DEFAULT_MIN_SLOT_MINUTES};
pub use merge::{merge, MinuteRange};
