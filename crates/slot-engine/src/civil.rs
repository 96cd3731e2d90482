//! Civil (zone-less) date and time value types.
//!
//! Dates and times cross the API boundary as `YYYY-MM-DD` and `HH:MM` strings
//! but are held internally as a `NaiveDate` and a minute-of-day count, so the
//! algorithms never operate on strings.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Result, SlotError};

const MINUTES_PER_DAY: u16 = 24 * 60;

// ── CivilDate ───────────────────────────────────────────────────────────────

/// A calendar date with no time-of-day or timezone component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CivilDate(NaiveDate);

impl CivilDate {
    /// Build a date from its components.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidDate`] if the components do not name a real
    /// Gregorian date (e.g. February 30).
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                SlotError::InvalidDate(format!("{:04}-{:02}-{:02}", year, month, day))
            })
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
        if !well_formed {
            return Err(SlotError::InvalidDate(format!("'{}' (expected YYYY-MM-DD)", s)));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| SlotError::InvalidDate(format!("'{}': {}", s, e)))
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturday or Sunday in the proleptic Gregorian calendar.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Ordinal day number (days since 0001-01-01, which is day 1).
    ///
    /// Subtracting two ordinals gives the exact number of days between the
    /// dates, regardless of month lengths.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.0.num_days_from_ce())
    }

    /// The following calendar day, or `None` at the end of the supported range.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }
}

impl fmt::Display for CivilDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CivilDate {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CivilDate {
    type Error = SlotError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CivilDate> for String {
    fn from(date: CivilDate) -> Self {
        date.to_string()
    }
}

// ── CivilTime ───────────────────────────────────────────────────────────────

/// A wall-clock time at minute granularity, with no date or timezone.
///
/// Valid points in time are `00:00 ≤ t < 24:00`. The value `24:00`
/// ([`CivilTime::END_OF_DAY`]) exists only as an exclusive end bound, so a
/// slot reaching the end of a full-day window can be represented. `parse`
/// accepts it; [`CivilTime::parse_start`] is used where a value opens an
/// interval and rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CivilTime(u16);

impl CivilTime {
    pub const MIDNIGHT: CivilTime = CivilTime(0);
    pub const LAST_MINUTE: CivilTime = CivilTime(MINUTES_PER_DAY - 1);
    pub const END_OF_DAY: CivilTime = CivilTime(MINUTES_PER_DAY);

    /// Build a time from minutes since midnight (`0..=1440`).
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    /// Build a time from a minute count already known to be in range,
    /// clamping anything past the end of the day to `24:00`.
    pub(crate) fn saturating_from_minutes(minutes: u16) -> Self {
        Self(minutes.min(MINUTES_PER_DAY))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(Self(hour * 60 + minute))
    }

    /// Parse a strict 24-hour `HH:MM` string.
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !well_formed {
            return Err(SlotError::InvalidTime(format!("'{}' (expected HH:MM)", s)));
        }
        let digits = |range: std::ops::Range<usize>| -> u16 {
            bytes[range].iter().fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
        };
        Self::from_hm(digits(0..2), digits(3..5))
            .map_err(|_| SlotError::InvalidTime(format!("'{}' is out of range", s)))
    }

    /// Parse an `HH:MM` string that opens an interval, rejecting `24:00`.
    pub fn parse_start(s: &str) -> Result<Self> {
        let time = Self::parse(s)?;
        if time.is_end_of_day() {
            return Err(SlotError::InvalidTime(format!("'{}' cannot start an interval", s)));
        }
        Ok(time)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    pub fn is_end_of_day(&self) -> bool {
        self.0 == MINUTES_PER_DAY
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for CivilTime {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CivilTime {
    type Error = SlotError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CivilTime> for String {
    fn from(time: CivilTime) -> Self {
        time.to_string()
    }
}

/// Deserialize a start bound through [`CivilTime::parse_start`].
pub(crate) fn deserialize_start<'de, D>(
    deserializer: D,
) -> std::result::Result<CivilTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    CivilTime::parse_start(&raw).map_err(de::Error::custom)
}

// ── Intervals ───────────────────────────────────────────────────────────────

/// A busy period reported by a calendar source, attributed to a single civil
/// day in the request's display timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub date: CivilDate,
    #[serde(deserialize_with = "deserialize_start")]
    pub start: CivilTime,
    pub end: CivilTime,
}

impl BusyInterval {
    pub fn new(date: CivilDate, start: CivilTime, end: CivilTime) -> Self {
        Self { date, start, end }
    }

    /// Build an interval from boundary strings, failing on any malformed part.
    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            date: CivilDate::parse(date)?,
            start: CivilTime::parse_start(start)?,
            end: CivilTime::parse(end)?,
        })
    }
}

/// An available window on a single civil day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub date: CivilDate,
    #[serde(deserialize_with = "deserialize_start")]
    pub start: CivilTime,
    pub end: CivilTime,
}

impl FreeSlot {
    pub fn new(date: CivilDate, start: CivilTime, end: CivilTime) -> Self {
        Self { date, start, end }
    }

    pub fn parse(date: &str, start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            date: CivilDate::parse(date)?,
            start: CivilTime::parse_start(start)?,
            end: CivilTime::parse(end)?,
        })
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }
}

/// An inclusive range of civil dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: CivilDate,
    pub end: CivilDate,
}

impl DateRange {
    pub fn new(start: CivilDate, end: CivilDate) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: CivilDate::parse(start)?,
            end: CivilDate::parse(end)?,
        })
    }

    /// Every date from `start` to `end` inclusive, in calendar order.
    ///
    /// An inverted range yields nothing.
    pub fn days(&self) -> impl Iterator<Item = CivilDate> {
        let end = self.end.0;
        self.start
            .0
            .iter_days()
            .take_while(move |d| *d <= end)
            .map(CivilDate)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, date: CivilDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ── Timezone ────────────────────────────────────────────────────────────────

/// A validated IANA timezone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timezone(Tz);

impl Timezone {
    pub const UTC: Timezone = Timezone(Tz::UTC);

    /// Parse an IANA name such as `America/New_York`.
    ///
    /// # Errors
    ///
    /// Returns [`SlotError::InvalidTimezone`] if the name is not in the tz database.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse::<Tz>()
            .map(Self)
            .map_err(|_| SlotError::InvalidTimezone(format!("'{}'", s)))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }
}

impl From<Tz> for Timezone {
    fn from(tz: Tz) -> Self {
        Self(tz)
    }
}

impl fmt::Display for Timezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timezone {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timezone {
    type Error = SlotError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Timezone> for String {
    fn from(zone: Timezone) -> Self {
        zone.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_dates() {
        let date = CivilDate::parse("2024-06-03").unwrap();
        assert_eq!(date.to_string(), "2024-06-03");
        assert_eq!(date.weekday(), Weekday::Mon);
        assert!(!date.is_weekend());
        assert!(CivilDate::parse("2024-06-08").unwrap().is_weekend());
        assert!(CivilDate::parse("2024-06-09").unwrap().is_weekend());
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["2024-6-03", "2024/06/03", "2024-02-30", "", "20240603", "+2024-06-0"] {
            assert!(CivilDate::parse(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn ordinal_difference_is_exact_across_short_months() {
        let feb_end = CivilDate::parse("2023-02-28").unwrap();
        let mar_start = CivilDate::parse("2023-03-01").unwrap();
        assert_eq!(mar_start.ordinal() - feb_end.ordinal(), 1);

        let jan_31 = CivilDate::parse("2024-01-31").unwrap();
        let leap_day = CivilDate::parse("2024-02-29").unwrap();
        assert_eq!(leap_day.ordinal() - jan_31.ordinal(), 29);
    }

    #[test]
    fn parses_and_formats_times() {
        let t = CivilTime::parse("09:05").unwrap();
        assert_eq!(t.minutes(), 545);
        assert_eq!(t.to_string(), "09:05");
        assert_eq!(CivilTime::parse("00:00").unwrap(), CivilTime::MIDNIGHT);
        assert_eq!(CivilTime::parse("23:59").unwrap(), CivilTime::LAST_MINUTE);
        assert_eq!(CivilTime::parse("24:00").unwrap(), CivilTime::END_OF_DAY);
        assert_eq!(CivilTime::END_OF_DAY.to_string(), "24:00");
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["9:00", "09:60", "24:01", "25:00", "0900", "ab:cd", "09:00:00"] {
            assert!(CivilTime::parse(bad).is_err(), "{} should be rejected", bad);
        }
        assert!(CivilTime::from_minutes(1441).is_err());
    }

    #[test]
    fn date_range_enumerates_inclusive_days() {
        let range = DateRange::parse("2024-02-27", "2024-03-01").unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(days, ["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn inverted_date_range_is_empty() {
        let range = DateRange::parse("2024-03-05", "2024-03-01").unwrap();
        assert!(range.is_empty());
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn timezone_round_trips_through_name() {
        let zone = Timezone::parse("Asia/Tokyo").unwrap();
        assert_eq!(zone.name(), "Asia/Tokyo");
        assert!(matches!(
            Timezone::parse("Mars/Olympus_Mons"),
            Err(SlotError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn intervals_deserialize_and_ignore_extra_fields() {
        let json = r#"{"date":"2024-06-03","start":"10:00","end":"11:00","title":"Standup"}"#;
        let busy: BusyInterval = serde_json::from_str(json).unwrap();
        assert_eq!(busy, BusyInterval::parse("2024-06-03", "10:00", "11:00").unwrap());

        let bad = r#"{"date":"2024-06-03","start":"10:0","end":"11:00"}"#;
        assert!(serde_json::from_str::<BusyInterval>(bad).is_err());
    }

    #[test]
    fn end_of_day_only_closes_an_interval() {
        assert!(matches!(CivilTime::parse_start("24:00"), Err(SlotError::InvalidTime(_))));
        assert_eq!(CivilTime::parse_start("00:00").unwrap(), CivilTime::MIDNIGHT);

        assert!(BusyInterval::parse("2024-06-03", "24:00", "24:00").is_err());
        assert!(FreeSlot::parse("2024-06-03", "24:00", "24:00").is_err());
        let slot = FreeSlot::parse("2024-06-03", "23:00", "24:00").unwrap();
        assert_eq!(slot.end, CivilTime::END_OF_DAY);

        let json = r#"{"date":"2024-06-03","start":"24:00","end":"24:00"}"#;
        assert!(serde_json::from_str::<BusyInterval>(json).is_err());
        assert!(serde_json::from_str::<FreeSlot>(json).is_err());
        let json = r#"{"date":"2024-06-03","start":"23:00","end":"24:00"}"#;
        assert!(serde_json::from_str::<FreeSlot>(json).is_ok());
    }
}
