//! Two-dimensional (schedule x slot) views over the schedules of one day.

mod multi;
mod single;

#[cfg(test)]
mod multi_tests;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use vetsched_core::types::MINUTES_PER_DAY;

use crate::event::{ScheduleEvent, ScheduleView};
use crate::schedule::Schedule;
use crate::slot::{at_minutes, slot_minutes};

pub use multi::MultiScheduleGrid;
pub use single::SingleScheduleGrid;

/// Classification of a (schedule, slot) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Availability {
    /// Within working hours, with no event.
    Free,
    /// An event occupies the slot.
    Busy,
    /// Outside the schedule's working hours.
    Unavailable,
}

/// ## Summary
/// A day of schedules laid out on a single shared slot axis.
///
/// Slots are indexed from `0` to `slots() - 1`; every schedule in the grid
/// uses the same axis.
pub trait ScheduleEventGrid {
    /// Returns the view the grid was built for.
    fn schedule_view(&self) -> &ScheduleView;

    /// Returns the grid date.
    fn date(&self) -> NaiveDate;

    /// Returns the schedules, in display order.
    fn schedules(&self) -> &[Schedule];

    /// Returns the number of slots.
    fn slots(&self) -> usize;

    /// Returns the size of each slot, in minutes.
    fn slot_size(&self) -> u32;

    /// Returns the minutes from midnight that a slot starts at.
    fn start_mins(&self, slot: usize) -> u32;

    /// Returns the slot that `time` falls in, or `None` if it is outside
    /// every slot of the grid day.
    fn slot(&self, time: NaiveDateTime) -> Option<usize>;

    /// Returns the event to display at a slot of a schedule, or `None`.
    fn event<'a>(&'a self, schedule: &'a Schedule, slot: usize) -> Option<&'a ScheduleEvent>;

    /// ## Summary
    /// Returns the number of slots `event` occupies from `slot`.
    ///
    /// If the event began before the slot, the remaining slots are returned.
    fn event_slots(&self, event: &ScheduleEvent, slot: usize) -> usize;

    /// Returns the hour (0..=23) that a slot starts in.
    fn hour(&self, slot: usize) -> u32 {
        self.start_mins(slot) / 60
    }

    /// Returns the time a slot starts at, regardless of any schedule's hours.
    fn slot_time(&self, slot: usize) -> NaiveDateTime {
        at_minutes(self.date(), self.start_mins(slot))
    }

    /// ## Summary
    /// Returns the time a slot starts at for a schedule.
    ///
    /// Returns `None` if the slot is past the end of the grid, or outside
    /// the schedule's working hours.
    fn start_time(&self, schedule: &Schedule, slot: usize) -> Option<NaiveDateTime> {
        if slot >= self.slots() {
            return None;
        }
        let mins = self.start_mins(slot);
        schedule
            .is_open(mins)
            .then(|| at_minutes(self.date(), mins))
    }

    /// Returns an event overlapping a slot of a schedule, or `None`. Overlap
    /// is measured in grid slots, not the schedule's own slot size.
    fn occupant<'a>(&'a self, schedule: &'a Schedule, slot: usize) -> Option<&'a ScheduleEvent> {
        if slot >= self.slots() {
            return None;
        }
        let start = self.slot_time(slot);
        let end = start + TimeDelta::minutes(i64::from(self.slot_size()));
        schedule.intersecting_event_in(start, end, self.slot_size())
    }

    /// ## Summary
    /// Determines the availability of a slot for a schedule.
    ///
    /// A slot with an overlapping event is busy, even outside working hours.
    fn availability(&self, schedule: &Schedule, slot: usize) -> Availability {
        if slot >= self.slots() {
            return Availability::Unavailable;
        }
        if self.occupant(schedule, slot).is_some() {
            return Availability::Busy;
        }
        if schedule.is_open(self.start_mins(slot)) {
            Availability::Free
        } else {
            Availability::Unavailable
        }
    }

    /// ## Summary
    /// Returns how many consecutive slots from `slot` are unavailable for a
    /// schedule.
    ///
    /// Returns `0` if `slot` itself isn't unavailable.
    fn unavailable_slots(&self, schedule: &Schedule, slot: usize) -> usize {
        (slot..self.slots())
            .take_while(|&i| self.availability(schedule, i) == Availability::Unavailable)
            .count()
    }
}

/// Converts a slot index to the `u32` domain used for minutes.
pub(crate) fn slot_offset(slot: usize) -> u32 {
    u32::try_from(slot).unwrap_or(u32::MAX)
}

/// ## Summary
/// Returns the slot-aligned minutes an event covers on `date`.
///
/// Events running in from the previous day start at `0`; events running on
/// past midnight end at `1440`. Returns `None` if the event doesn't touch
/// `date`.
pub(crate) fn day_bounds(
    event: &ScheduleEvent,
    date: NaiveDate,
    slot_size: u32,
) -> Option<(u32, u32)> {
    if event.start_time.date() > date || event.end_time.date() < date {
        return None;
    }
    let start = if event.start_time.date() < date {
        0
    } else {
        slot_minutes(event.start_time, slot_size, false)
    };
    let end = if event.end_time.date() > date {
        MINUTES_PER_DAY
    } else {
        slot_minutes(event.end_time, slot_size, true)
    };
    Some((start, end.max(start)))
}
