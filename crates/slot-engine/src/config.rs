//! Request configuration.
//!
//! Every option has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! timezone = "Europe/Berlin"
//! include_weekends = false
//! min_slot_minutes = 30
//!
//! [working_hours]
//! start = "09:00"
//! end = "17:00"
//! ```

use serde::{Deserialize, Serialize};

use crate::civil::Timezone;
use crate::error::{Result, SlotError};
use crate::freeslots::{WorkingWindow, DEFAULT_MIN_SLOT_MINUTES};

/// Options for a single availability request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvailabilityConfig {
    /// Zone the busy intervals are expressed in and slots are derived in.
    pub timezone: Timezone,
    /// Daily window to search; absent means the full day.
    pub working_hours: Option<WorkingWindow>,
    pub include_weekends: bool,
    pub min_slot_minutes: u16,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            timezone: Timezone::from(chrono_tz::America::New_York),
            working_hours: None,
            include_weekends: false,
            min_slot_minutes: DEFAULT_MIN_SLOT_MINUTES,
        }
    }
}

impl AvailabilityConfig {
    /// Parse a TOML document, filling absent fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidConfig`] for malformed TOML, unknown keys,
    /// bad `HH:MM` strings or an unknown timezone.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| SlotError::InvalidConfig(e.to_string()))
    }

    /// The working window in effect, defaulting to the full day.
    pub fn window(&self) -> WorkingWindow {
        self.working_hours.unwrap_or(WorkingWindow::FULL_DAY)
    }
}
