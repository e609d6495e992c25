use chrono::{NaiveDate, NaiveDateTime};
use vetsched_core::config::GridDefaults;

use super::{ScheduleEventGrid, day_bounds, slot_offset};
use crate::error::GridResult;
use crate::event::{ScheduleEvent, ScheduleView};
use crate::schedule::Schedule;
use crate::slot::slot_minutes;

/// ## Summary
/// A grid over any number of schedules, on a uniform slot axis.
///
/// The axis runs from the earliest opening to the latest closing of the
/// schedules, widened to cover every event on the grid date, at the smallest
/// slot size of the schedules. With no schedules, `defaults` apply.
#[derive(Debug, Clone)]
pub struct MultiScheduleGrid {
    view: ScheduleView,
    date: NaiveDate,
    schedules: Vec<Schedule>,
    start_mins: u32,
    end_mins: u32,
    slot_size: u32,
}

impl MultiScheduleGrid {
    /// ## Summary
    /// Lays out `schedules`, with their events already loaded, for `date`.
    ///
    /// ## Errors
    /// Returns an error if `defaults` are invalid.
    pub fn new(
        view: ScheduleView,
        date: NaiveDate,
        schedules: Vec<Schedule>,
        defaults: &GridDefaults,
    ) -> GridResult<Self> {
        defaults.validate()?;

        let slot_size = schedules
            .iter()
            .map(Schedule::slot_size)
            .min()
            .unwrap_or(defaults.slot_size);
        let mut start_mins = schedules
            .iter()
            .map(Schedule::start_mins)
            .min()
            .unwrap_or(defaults.start_mins);
        let mut end_mins = schedules
            .iter()
            .map(Schedule::end_mins)
            .max()
            .unwrap_or(defaults.end_mins);

        for event in schedules.iter().flat_map(Schedule::events) {
            if let Some((start, end)) = day_bounds(event, date, slot_size) {
                start_mins = start_mins.min(start);
                end_mins = end_mins.max(end);
            }
        }
        let start_mins = (start_mins / slot_size) * slot_size;
        let end_mins = end_mins.div_ceil(slot_size) * slot_size;

        tracing::debug!(
            view = %view.name,
            %date,
            schedules = schedules.len(),
            start_mins,
            end_mins,
            slot_size,
            "Built multi-schedule grid"
        );

        Ok(Self {
            view,
            date,
            schedules,
            start_mins,
            end_mins,
            slot_size,
        })
    }

    /// Returns the minutes from midnight that the grid starts at.
    #[must_use]
    pub const fn grid_start_mins(&self) -> u32 {
        self.start_mins
    }

    /// Returns the minutes from midnight that the grid ends at.
    #[must_use]
    pub const fn grid_end_mins(&self) -> u32 {
        self.end_mins
    }

    /// Returns the slot boundary at or after `time`, clamped to the grid.
    fn end_slot(&self, time: NaiveDateTime) -> usize {
        if time.date() > self.date {
            return self.slots();
        }
        if time.date() < self.date {
            return 0;
        }
        let mins = slot_minutes(time, self.slot_size, true);
        if mins <= self.start_mins {
            return 0;
        }
        (((mins - self.start_mins) / self.slot_size) as usize).min(self.slots())
    }
}

impl ScheduleEventGrid for MultiScheduleGrid {
    fn schedule_view(&self) -> &ScheduleView {
        &self.view
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    fn slots(&self) -> usize {
        ((self.end_mins - self.start_mins) / self.slot_size) as usize
    }

    fn slot_size(&self) -> u32 {
        self.slot_size
    }

    fn start_mins(&self, slot: usize) -> u32 {
        self.start_mins
            .saturating_add(slot_offset(slot).saturating_mul(self.slot_size))
    }

    fn slot(&self, time: NaiveDateTime) -> Option<usize> {
        if time.date() != self.date {
            return None;
        }
        let mins = slot_minutes(time, self.slot_size, false);
        (mins >= self.start_mins && mins < self.end_mins)
            .then(|| ((mins - self.start_mins) / self.slot_size) as usize)
    }

    fn event<'a>(&'a self, schedule: &'a Schedule, slot: usize) -> Option<&'a ScheduleEvent> {
        if slot >= self.slots() {
            return None;
        }
        let time = self.slot_time(slot);
        schedule.event_at(time, self.slot_size).or_else(|| {
            // the first slot also shows an event carried over from earlier
            if slot == 0 {
                schedule
                    .intersecting_event_in(time, time, self.slot_size)
                    .filter(|event| event.start_time < time)
            } else {
                None
            }
        })
    }

    fn event_slots(&self, event: &ScheduleEvent, slot: usize) -> usize {
        if slot >= self.slots() {
            return 0;
        }
        let slots = self.end_slot(event.end_time).saturating_sub(slot);
        if slots == 0 && self.slot(event.start_time) == Some(slot) {
            1
        } else {
            slots
        }
    }
}
