//! One resource's calendar for a day.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use vetsched_core::config::GridDefaults;
use vetsched_core::error::CoreError;
use vetsched_core::types::{MINUTES_PER_DAY, Reference};

use crate::error::GridResult;
use crate::event::{ScheduleEntity, ScheduleEvent};
use crate::intersect::{IntersectComparator, Span, TimeSpan};
use crate::slot::{minutes_of_time, slot_time};

/// Events for one schedule on one day, with the schedule's slot geometry.
///
/// Events are kept ordered by start time; [`Schedule::add_event`] inserts in
/// place, so the binary-search lookups are always valid.
#[derive(Debug, Clone)]
pub struct Schedule {
    entity: ScheduleEntity,
    start_mins: Option<u32>,
    end_mins: Option<u32>,
    slot_size: u32,
    events: Vec<ScheduleEvent>,
}

impl Schedule {
    /// ## Summary
    /// Creates an empty schedule.
    ///
    /// `None` bounds are unbounded: the schedule opens at midnight and/or
    /// closes at the following midnight.
    ///
    /// ## Errors
    /// Returns an error if `slot_size` is zero, a bound lies past midnight, or
    /// the schedule closes before it opens.
    pub fn new(
        entity: ScheduleEntity,
        start_mins: Option<u32>,
        end_mins: Option<u32>,
        slot_size: u32,
    ) -> GridResult<Self> {
        if slot_size == 0 {
            return Err(CoreError::InvalidSlotSize(slot_size).into());
        }
        for mins in [start_mins, end_mins].into_iter().flatten() {
            if mins > MINUTES_PER_DAY {
                return Err(CoreError::MinutesOutOfRange(mins).into());
            }
        }
        let (start, end) = (start_mins.unwrap_or(0), end_mins.unwrap_or(MINUTES_PER_DAY));
        if start > end {
            return Err(CoreError::InvalidHours {
                start_mins: start,
                end_mins: end,
            }
            .into());
        }
        Ok(Self {
            entity,
            start_mins,
            end_mins,
            slot_size,
            events: Vec::new(),
        })
    }

    /// ## Summary
    /// Creates an empty schedule from its configuration, filling in missing
    /// opening/closing times and slot size from `defaults`.
    ///
    /// ## Errors
    /// Returns an error if the resulting geometry is invalid.
    pub fn from_entity(entity: ScheduleEntity, defaults: &GridDefaults) -> GridResult<Self> {
        let start_mins = entity
            .start_time
            .map_or(defaults.start_mins, minutes_of_time);
        // a closing time of 00:00 means the schedule runs to midnight
        let end_mins = entity.end_time.map_or(defaults.end_mins, |t| {
            match minutes_of_time(t) {
                0 => MINUTES_PER_DAY,
                mins => mins,
            }
        });
        let slot_size = entity
            .slot_size
            .filter(|size| *size > 0)
            .unwrap_or(defaults.slot_size);
        Self::new(entity, Some(start_mins), Some(end_mins), slot_size)
    }

    /// Copies the schedule's identity and geometry, without its events.
    #[must_use]
    pub fn clone_geometry(&self) -> Self {
        Self {
            entity: self.entity.clone(),
            start_mins: self.start_mins,
            end_mins: self.end_mins,
            slot_size: self.slot_size,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn entity(&self) -> &ScheduleEntity {
        &self.entity
    }

    #[must_use]
    pub const fn reference(&self) -> Reference {
        self.entity.reference
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.entity.name
    }

    /// Opening time as minutes from midnight; `0` if unbounded.
    #[must_use]
    pub fn start_mins(&self) -> u32 {
        self.start_mins.unwrap_or(0)
    }

    /// Closing time as minutes from midnight; `1440` if unbounded.
    #[must_use]
    pub fn end_mins(&self) -> u32 {
        self.end_mins.unwrap_or(MINUTES_PER_DAY)
    }

    #[must_use]
    pub const fn slot_size(&self) -> u32 {
        self.slot_size
    }

    #[must_use]
    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    /// Determines if the schedule is open at the given minutes from midnight.
    #[must_use]
    pub fn is_open(&self, mins: u32) -> bool {
        mins >= self.start_mins() && mins < self.end_mins()
    }

    /// Adds an event, after any events starting at or before it.
    pub fn add_event(&mut self, event: ScheduleEvent) {
        let index = self
            .events
            .partition_point(|e| e.start_time <= event.start_time);
        tracing::trace!(
            schedule = %self.entity.name,
            act = %event.act,
            index,
            "Adding event"
        );
        self.events.insert(index, event);
    }

    /// Returns the index of the event for an act, or `None` if it isn't present.
    #[must_use]
    pub fn index_of(&self, act: &Reference) -> Option<usize> {
        self.events.iter().position(|e| e.act == *act)
    }

    /// Returns the event for an act, or `None` if it isn't present.
    #[must_use]
    pub fn event_by_act(&self, act: &Reference) -> Option<&ScheduleEvent> {
        self.index_of(act).map(|index| &self.events[index])
    }

    /// Determines if any event intersects `probe`, at this schedule's slot size.
    #[must_use]
    pub fn has_intersecting_event<T: TimeSpan + ?Sized>(&self, probe: &T) -> bool {
        self.find_intersecting(probe).is_some()
    }

    /// Returns an event intersecting `[start, end)`, or `None` if there is none.
    #[must_use]
    pub fn intersecting_event_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<&ScheduleEvent> {
        self.find_intersecting(&Span::new(start, end))
    }

    /// ## Summary
    /// Returns an event intersecting `[start, end)` when both are quantized
    /// to `slot_size` rather than this schedule's slot size, or `None`.
    ///
    /// Grids whose slots are smaller than the schedule's use this so that
    /// an event only occupies the grid slots it actually overlaps.
    #[must_use]
    pub fn intersecting_event_in(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        slot_size: u32,
    ) -> Option<&ScheduleEvent> {
        self.find_intersecting_at(&Span::new(start, end), slot_size)
    }

    /// Returns an event whose interval contains `time`, or `None` if there is none.
    #[must_use]
    pub fn intersecting_event(&self, time: NaiveDateTime) -> Option<&ScheduleEvent> {
        self.find_intersecting(&Span::at(time))
    }

    /// ## Summary
    /// Returns an event that starts in the same slot as `time`, or `None`.
    ///
    /// Unlike the intersection lookups this only matches where an event
    /// starts. Where several events start in the slot, the earliest is returned.
    #[must_use]
    pub fn event_at(&self, time: NaiveDateTime, slot_size: u32) -> Option<&ScheduleEvent> {
        let target = slot_time(time, slot_size, false);
        let index = self
            .events
            .partition_point(|e| slot_time(e.start_time, slot_size, false) < target);
        self.events
            .get(index)
            .filter(|e| slot_time(e.start_time, slot_size, false) == target)
    }

    fn find_intersecting<T: TimeSpan + ?Sized>(&self, probe: &T) -> Option<&ScheduleEvent> {
        self.find_intersecting_at(probe, self.slot_size)
    }

    fn find_intersecting_at<T: TimeSpan + ?Sized>(
        &self,
        probe: &T,
        slot_size: u32,
    ) -> Option<&ScheduleEvent> {
        let comparator = IntersectComparator::new(slot_size);
        if let Ok(index) = self
            .events
            .binary_search_by(|event| comparator.compare(event, probe))
        {
            return Some(&self.events[index]);
        }
        // A long event enclosing shorter ones breaks the partitioning the
        // binary search relies on; fall back to scanning events that start
        // before the probe ends.
        let (_, probe_end) = comparator.quantize(probe);
        let candidates = self
            .events
            .partition_point(|e| comparator.quantize(e).0 < probe_end);
        self.events[..candidates]
            .iter()
            .find(|event| comparator.compare(*event, probe) == Ordering::Equal)
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
