//! Conversion between timestamps and slot-aligned minutes from midnight.
//!
//! Times are naive local times; no timezone or DST adjustment is applied.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// Returns the minutes from midnight of a time of day. Seconds are ignored.
#[must_use]
pub fn minutes_of_time(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Returns the minutes from midnight of a timestamp. Seconds are ignored.
#[must_use]
pub fn minutes_of_day(time: NaiveDateTime) -> u32 {
    minutes_of_time(time.time())
}

/// ## Summary
/// Returns the minutes from midnight for `time`, rounded down to a multiple
/// of `slot_size`, or up when `round_up` is set and the time isn't already
/// on a slot boundary.
///
/// A zero `slot_size` is treated as one minute.
#[must_use]
pub fn slot_minutes(time: NaiveDateTime, slot_size: u32, round_up: bool) -> u32 {
    let slot_size = slot_size.max(1);
    let mins = minutes_of_day(time);
    let floor = (mins / slot_size) * slot_size;
    if round_up && floor != mins {
        floor + slot_size
    } else {
        floor
    }
}

/// Same as [`slot_minutes`], expressed as a timestamp on the same day.
///
/// Rounding up past the last slot of the day yields a time on the next day.
#[must_use]
pub fn slot_time(time: NaiveDateTime, slot_size: u32, round_up: bool) -> NaiveDateTime {
    at_minutes(time.date(), slot_minutes(time, slot_size, round_up))
}

/// Returns the timestamp `mins` minutes after midnight of `date`.
#[must_use]
pub fn at_minutes(date: NaiveDate, mins: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::minutes(i64::from(mins))
}

/// Formats minutes from midnight as `HH:MM`.
#[must_use]
pub fn format_minutes(mins: u32) -> String {
    format!("{:02}:{:02}", mins / 60, mins % 60)
}
