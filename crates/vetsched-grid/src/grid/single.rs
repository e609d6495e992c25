use chrono::{NaiveDate, NaiveDateTime};

use super::{ScheduleEventGrid, day_bounds};
use crate::event::{ScheduleEvent, ScheduleView};
use crate::schedule::Schedule;
use crate::slot::minutes_of_day;

/// A slot on the laid-out axis.
#[derive(Debug, Clone, Copy)]
struct Slot {
    start_mins: u32,
    /// Index into `groups`, if an event owns the slot.
    group: Option<usize>,
}

/// The run of slots owned by one event.
#[derive(Debug, Clone, Copy)]
struct SlotGroup {
    /// Index into the schedule's events.
    event: usize,
    start_mins: u32,
    end_mins: u32,
    start_slot: usize,
    slots: usize,
}

/// ## Summary
/// A grid for a single schedule.
///
/// Double-booked and overlapping events are laid out one after another,
/// each owning a contiguous run of slots, so slot start times repeat where
/// events overlap. Every slot in an event's run reports that event.
#[derive(Debug, Clone)]
pub struct SingleScheduleGrid {
    view: ScheduleView,
    date: NaiveDate,
    schedules: Vec<Schedule>,
    end_mins: u32,
    slot_size: u32,
    slots: Vec<Slot>,
    groups: Vec<SlotGroup>,
}

impl SingleScheduleGrid {
    /// Lays out `schedule`, with its events already loaded, for `date`.
    #[must_use]
    pub fn new(view: ScheduleView, date: NaiveDate, schedule: Schedule) -> Self {
        let slot_size = schedule.slot_size();
        let mut start_mins = schedule.start_mins();
        let mut end_mins = schedule.end_mins();

        let mut groups = Vec::new();
        for (index, event) in schedule.events().iter().enumerate() {
            let Some((start, end)) = day_bounds(event, date, slot_size) else {
                continue;
            };
            start_mins = start_mins.min(start);
            end_mins = end_mins.max(end);
            groups.push(SlotGroup {
                event: index,
                start_mins: start,
                end_mins: end,
                start_slot: 0,
                slots: 0,
            });
        }
        let start_mins = (start_mins / slot_size) * slot_size;
        let end_mins = end_mins.div_ceil(slot_size) * slot_size;

        let slots = layout(&mut groups, start_mins, end_mins, slot_size);

        tracing::debug!(
            view = %view.name,
            schedule = %schedule.name(),
            %date,
            events = groups.len(),
            slots = slots.len(),
            "Built single-schedule grid"
        );

        Self {
            view,
            date,
            schedules: vec![schedule],
            end_mins,
            slot_size,
            slots,
            groups,
        }
    }

    /// Returns the schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedules[0]
    }

    /// Returns the first slot whose interval contains `mins`, or `None`.
    #[must_use]
    pub fn first_slot(&self, mins: u32) -> Option<usize> {
        self.slots
            .iter()
            .take_while(|slot| slot.start_mins <= mins)
            .position(|slot| self.contains(slot, mins))
    }

    /// Returns the last slot whose interval contains `mins`, or `None`.
    #[must_use]
    pub fn last_slot(&self, mins: u32) -> Option<usize> {
        self.slots
            .iter()
            .rposition(|slot| self.contains(slot, mins))
    }

    fn contains(&self, slot: &Slot, mins: u32) -> bool {
        slot.start_mins <= mins && mins < slot.start_mins + self.slot_size
    }

    fn group(&self, slot: usize) -> Option<&SlotGroup> {
        self.slots
            .get(slot)
            .and_then(|s| s.group)
            .map(|group| &self.groups[group])
    }
}

/// Builds the slot axis, recording each group's slot run.
fn layout(groups: &mut [SlotGroup], start_mins: u32, end_mins: u32, slot_size: u32) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut mins = start_mins;
    for (index, group) in groups.iter_mut().enumerate() {
        if mins < group.start_mins {
            while mins < group.start_mins {
                slots.push(Slot {
                    start_mins: mins,
                    group: None,
                });
                mins += slot_size;
            }
        } else {
            // double booked or overlapping: restart at the group's own time
            mins = group.start_mins;
        }
        group.start_slot = slots.len();
        loop {
            slots.push(Slot {
                start_mins: mins,
                group: Some(index),
            });
            mins += slot_size;
            if mins >= group.end_mins {
                break;
            }
        }
        group.slots = slots.len() - group.start_slot;
    }
    while mins < end_mins {
        slots.push(Slot {
            start_mins: mins,
            group: None,
        });
        mins += slot_size;
    }
    slots
}

impl ScheduleEventGrid for SingleScheduleGrid {
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
        self.slots.len()
    }

    fn slot_size(&self) -> u32 {
        self.slot_size
    }

    fn start_mins(&self, slot: usize) -> u32 {
        self.slots
            .get(slot)
            .map_or(self.end_mins, |s| s.start_mins)
    }

    fn slot(&self, time: NaiveDateTime) -> Option<usize> {
        if time.date() != self.date {
            return None;
        }
        self.first_slot(minutes_of_day(time))
    }

    fn event<'a>(&'a self, _schedule: &'a Schedule, slot: usize) -> Option<&'a ScheduleEvent> {
        self.group(slot)
            .map(|group| &self.schedule().events()[group.event])
    }

    fn occupant<'a>(&'a self, schedule: &'a Schedule, slot: usize) -> Option<&'a ScheduleEvent> {
        self.event(schedule, slot)
    }

    fn event_slots(&self, event: &ScheduleEvent, slot: usize) -> usize {
        self.group(slot)
            .filter(|group| self.schedule().events()[group.event].act == event.act)
            .map_or(0, |group| (group.start_slot + group.slots).saturating_sub(slot))
    }
}
