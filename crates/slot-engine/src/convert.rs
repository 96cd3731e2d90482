//! Timezone-aware conversion of civil date/time readings.
//!
//! A wall-clock reading only denotes an instant once a zone is attached. To
//! move a slot from one zone to another, each bound is resolved to the
//! instant it names in the source zone and that instant is rendered back as a
//! civil reading in the target zone.
//!
//! # Resolving a reading
//!
//! The UTC offset in effect depends on the instant being resolved, so it
//! cannot be looked up up front. Instead the reading is first taken literally
//! as UTC (the *guess*), the guess is rendered in the zone to see which offset
//! applied, and the discrepancy between the wanted and the rendered reading is
//! subtracted from the guess. The day part of the discrepancy uses ordinal day
//! numbers, so month and year boundaries need no special casing.
//!
//! One correction is enough unless a DST transition lies between the guess and
//! the wanted instant, in which case a second correction lands on it. Applying
//! a correction to an already converged instant is a no-op.
//!
//! A reading that falls in a spring-forward gap never renders back. Its two
//! corrections land one gap-length either side of the transition, and the
//! later one is taken, so the reading shifts forward past the gap.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};

use crate::civil::{CivilDate, CivilTime, FreeSlot, Timezone};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// The instant obtained by reading `(date, time)` as if it were already UTC.
pub fn utc_literal(date: CivilDate, time: CivilTime) -> DateTime<Utc> {
    date.naive().and_time(NaiveTime::MIN).and_utc() + Duration::minutes(i64::from(time.minutes()))
}

/// Find the instant whose civil reading in `zone` is `(date, time)`.
///
/// A reading repeated by a fall-back overlap resolves using whichever offset
/// was in effect at the literal-UTC guess. A reading skipped by a
/// spring-forward gap resolves to the later of the two candidate instants, so
/// it reads as the wall clock after the transition (`02:30` becomes `03:30`
/// for a one-hour gap) in every zone.
pub fn resolve_instant(date: CivilDate, time: CivilTime, zone: &Timezone) -> DateTime<Utc> {
    let first = correct_guess(utc_literal(date, time), date, time, zone);
    if renders_as(first, date, time, zone) {
        return first;
    }
    let second = correct_guess(first, date, time, zone);
    if renders_as(second, date, time, zone) {
        return second;
    }
    // Spring-forward gap: the two passes straddle the transition.
    first.max(second)
}

/// Apply one offset correction to `guess` so it renders as `(date, time)` in `zone`.
pub fn correct_guess(
    guess: DateTime<Utc>,
    date: CivilDate,
    time: CivilTime,
    zone: &Timezone,
) -> DateTime<Utc> {
    let (got_date, got_time) = render_in_timezone(guess, zone);
    let diff_minutes = civil_minutes(date, time) - civil_minutes(got_date, got_time);
    guess + Duration::minutes(diff_minutes)
}

/// Minutes since the start of the proleptic Gregorian calendar; `24:00` of
/// one date equals `00:00` of the next.
fn civil_minutes(date: CivilDate, time: CivilTime) -> i64 {
    date.ordinal() * MINUTES_PER_DAY + i64::from(time.minutes())
}

fn renders_as(instant: DateTime<Utc>, date: CivilDate, time: CivilTime, zone: &Timezone) -> bool {
    let (got_date, got_time) = render_in_timezone(instant, zone);
    civil_minutes(got_date, got_time) == civil_minutes(date, time)
}

/// Render an instant as a civil date and minute-precision time in `zone`.
pub fn render_in_timezone(instant: DateTime<Utc>, zone: &Timezone) -> (CivilDate, CivilTime) {
    let local = instant.with_timezone(&zone.tz()).naive_local();
    let minutes = local.hour() * 60 + local.minute();
    (
        CivilDate::from_naive(local.date()),
        CivilTime::saturating_from_minutes(minutes as u16),
    )
}

/// Render an exclusive end bound, expressing local midnight as `24:00` of the
/// previous day so a slot ending at midnight stays on its own date.
fn render_end_bound(instant: DateTime<Utc>, zone: &Timezone) -> (CivilDate, CivilTime) {
    let (date, time) = render_in_timezone(instant, zone);
    if time != CivilTime::MIDNIGHT {
        return (date, time);
    }
    match date.pred() {
        Some(previous) => (previous, CivilTime::END_OF_DAY),
        None => (date, time),
    }
}

/// Re-express free slots given in `source` as free slots in `target`.
///
/// Slots keep their readings when the zones are equal. A slot whose
/// converted bounds land on different target dates is split at local midnight
/// into `start–23:59` on the first date and `00:00–end` on the second.
/// Slots with `start >= end`, and pieces left with no width, are dropped.
pub fn convert_slots(slots: &[FreeSlot], source: &Timezone, target: &Timezone) -> Vec<FreeSlot> {
    if source == target {
        return slots.iter().filter(|s| s.start < s.end).cloned().collect();
    }

    let mut converted = Vec::with_capacity(slots.len());
    for slot in slots {
        if slot.start >= slot.end {
            tracing::debug!(
                date = %slot.date,
                start = %slot.start,
                end = %slot.end,
                "skipping slot with no width"
            );
            continue;
        }

        let start = resolve_instant(slot.date, slot.start, source);
        let end = resolve_instant(slot.date, slot.end, source);

        let (start_date, start_time) = render_in_timezone(start, target);
        let (end_date, end_time) = render_end_bound(end, target);

        if start_date == end_date {
            push_nonempty(&mut converted, FreeSlot::new(start_date, start_time, end_time));
        } else {
            tracing::debug!(
                date = %slot.date,
                start = %slot.start,
                end = %slot.end,
                source = %source,
                target = %target,
                "slot crosses target midnight, splitting"
            );
            push_nonempty(
                &mut converted,
                FreeSlot::new(start_date, start_time, CivilTime::LAST_MINUTE),
            );
            push_nonempty(
                &mut converted,
                FreeSlot::new(end_date, CivilTime::MIDNIGHT, end_time),
            );
        }
    }

    converted
}

fn push_nonempty(slots: &mut Vec<FreeSlot>, slot: FreeSlot) {
    if slot.start < slot.end {
        slots.push(slot);
    }
}
