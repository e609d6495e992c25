//! Tests for the multi-schedule grid.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use vetsched_core::config::GridDefaults;
use vetsched_core::types::Reference;

use super::{Availability, MultiScheduleGrid, ScheduleEventGrid};
use crate::event::{ScheduleEntity, ScheduleEvent, ScheduleView};
use crate::schedule::Schedule;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    date().and_hms_opt(hour, minute, 0).expect("valid time")
}

fn view() -> ScheduleView {
    ScheduleView::new(Reference::generate(), "Consults")
}

fn schedule(name: &str, start: u32, end: u32, slot_size: u32) -> Schedule {
    let entity = ScheduleEntity::new(Reference::generate(), name);
    Schedule::new(entity, Some(start * 60), Some(end * 60), slot_size).expect("valid schedule")
}

fn add(schedule: &mut Schedule, start: NaiveDateTime, end: NaiveDateTime) -> ScheduleEvent {
    let event = ScheduleEvent::new(Reference::generate(), schedule.reference(), start, end);
    schedule.add_event(event.clone());
    event
}

/// Room 1 open 09:00-17:00 with a 10:00-10:30 appointment; Room 2 open 08:00-18:00.
fn scenario() -> (MultiScheduleGrid, ScheduleEvent) {
    let mut room1 = schedule("Room 1", 9, 17, 15);
    let appointment = add(&mut room1, at(10, 0), at(10, 30));
    let room2 = schedule("Room 2", 8, 18, 15);
    let grid = MultiScheduleGrid::new(view(), date(), vec![room1, room2], &GridDefaults::default())
        .expect("valid grid");
    (grid, appointment)
}

#[test_log::test]
fn test_window_is_union_of_hours() {
    let (grid, _) = scenario();
    assert_eq!(grid.grid_start_mins(), 8 * 60);
    assert_eq!(grid.grid_end_mins(), 18 * 60);
    assert_eq!(grid.slot_size(), 15);
    assert_eq!(grid.slots(), 40);
    assert_eq!(grid.start_mins(0), 8 * 60);
    assert_eq!(grid.hour(4), 9);
}

#[test]
fn test_availability_scenario() {
    let (grid, _) = scenario();
    let room1 = &grid.schedules()[0];

    let ten = grid.slot(at(10, 0)).expect("10:00 in grid");
    let ten_fifteen = grid.slot(at(10, 15)).expect("10:15 in grid");
    let ten_forty_five = grid.slot(at(10, 45)).expect("10:45 in grid");
    let eight = grid.slot(at(8, 0)).expect("08:00 in grid");
    let five_pm = grid.slot(at(17, 0)).expect("17:00 in grid");

    assert_eq!(grid.availability(room1, ten), Availability::Busy);
    assert_eq!(grid.availability(room1, ten_fifteen), Availability::Busy);
    assert_eq!(grid.availability(room1, ten_forty_five), Availability::Free);
    assert_eq!(grid.availability(room1, eight), Availability::Unavailable);
    assert_eq!(grid.availability(room1, five_pm), Availability::Unavailable);

    // four 15 minute slots between 08:00 and 09:00
    assert_eq!(grid.unavailable_slots(room1, eight), 4);
    // everything from 17:00 to the end of the grid
    assert_eq!(grid.unavailable_slots(room1, five_pm), grid.slots() - five_pm);
    assert_eq!(grid.unavailable_slots(room1, ten_forty_five), 0);
    assert_eq!(grid.unavailable_slots(room1, ten), 0);

    let room2 = &grid.schedules()[1];
    assert_eq!(grid.availability(room2, eight), Availability::Free);
    assert_eq!(grid.availability(room2, ten), Availability::Free);
}

#[test]
fn test_slot_and_start_time_are_inverse_within_hours() {
    let (grid, _) = scenario();
    for schedule in grid.schedules() {
        for slot in 0..grid.slots() {
            if let Some(time) = grid.start_time(schedule, slot) {
                assert_eq!(grid.slot(time), Some(slot));
            } else {
                assert_eq!(grid.availability(schedule, slot), Availability::Unavailable);
            }
        }
    }
}

#[test]
fn test_start_time_outside_hours_is_none() {
    let (grid, _) = scenario();
    let room1 = &grid.schedules()[0];
    assert!(grid.start_time(room1, 0).is_none());
    assert_eq!(grid.start_time(room1, 4), Some(at(9, 0)));
    assert!(grid.start_time(room1, grid.slots()).is_none());
}

#[test]
fn test_slot_outside_grid_is_none() {
    let (grid, _) = scenario();
    assert_eq!(grid.slot(at(7, 59)), None);
    assert_eq!(grid.slot(at(18, 0)), None);
    assert_eq!(grid.slot(at(17, 59)), Some(grid.slots() - 1));
    assert_eq!(grid.slot(at(10, 0) + TimeDelta::days(1)), None);
    assert_eq!(grid.slot(at(10, 7)), grid.slot(at(10, 0)));
}

#[test]
fn test_event_reported_at_start_slot() {
    let (grid, appointment) = scenario();
    let room1 = &grid.schedules()[0];
    let ten = grid.slot(at(10, 0)).expect("10:00 in grid");

    assert_eq!(grid.event(room1, ten), Some(&appointment));
    assert!(grid.event(room1, ten + 1).is_none());
    assert_eq!(grid.occupant(room1, ten + 1), Some(&appointment));
    assert_eq!(grid.event_slots(&appointment, ten), 2);
    assert_eq!(grid.event_slots(&appointment, ten + 1), 1);
    assert!(grid.event(room1, grid.slots()).is_none());
}

#[test]
fn test_window_widens_to_cover_events() {
    let mut room = schedule("Room 1", 9, 17, 15);
    add(&mut room, at(7, 10), at(7, 40));
    add(&mut room, at(17, 30), at(18, 5));
    let grid = MultiScheduleGrid::new(view(), date(), vec![room], &GridDefaults::default())
        .expect("valid grid");

    assert_eq!(grid.grid_start_mins(), 7 * 60);
    assert_eq!(grid.grid_end_mins(), 18 * 60 + 15);

    let room = &grid.schedules()[0];
    let early = grid.slot(at(7, 10)).expect("07:10 in grid");
    assert_eq!(grid.availability(room, early), Availability::Busy);
    assert_eq!(grid.availability(room, 0), Availability::Busy);
}

#[test]
fn test_event_carried_over_from_previous_day() {
    let mut room = schedule("Room 1", 9, 17, 15);
    let overnight = add(&mut room, at(22, 0) - TimeDelta::days(1), at(9, 30));
    let grid = MultiScheduleGrid::new(view(), date(), vec![room], &GridDefaults::default())
        .expect("valid grid");

    assert_eq!(grid.grid_start_mins(), 0);
    let room = &grid.schedules()[0];
    assert_eq!(grid.event(room, 0), Some(&overnight));
    assert!(grid.event(room, 1).is_none());
    assert_eq!(grid.event_slots(&overnight, 0), 9 * 4 + 2);
}

#[test]
fn test_events_on_other_days_ignored() {
    let mut room = schedule("Room 1", 9, 17, 15);
    add(&mut room, at(6, 0) + TimeDelta::days(1), at(7, 0) + TimeDelta::days(1));
    let grid = MultiScheduleGrid::new(view(), date(), vec![room], &GridDefaults::default())
        .expect("valid grid");
    assert_eq!(grid.grid_start_mins(), 9 * 60);
}

#[test]
fn test_smallest_slot_size_wins() {
    let room1 = schedule("Room 1", 9, 17, 30);
    let room2 = schedule("Room 2", 9, 17, 10);
    let grid = MultiScheduleGrid::new(view(), date(), vec![room1, room2], &GridDefaults::default())
        .expect("valid grid");
    assert_eq!(grid.slot_size(), 10);
    assert_eq!(grid.slots(), 48);
}

#[test]
fn test_empty_view_uses_defaults() {
    let grid = MultiScheduleGrid::new(view(), date(), Vec::new(), &GridDefaults::default())
        .expect("valid grid");
    assert_eq!(grid.grid_start_mins(), 8 * 60);
    assert_eq!(grid.grid_end_mins(), 18 * 60);
    assert_eq!(grid.slots(), 40);
    assert!(grid.schedules().is_empty());
}

#[test]
fn test_invalid_defaults_rejected() {
    let defaults = GridDefaults {
        start_mins: 0,
        end_mins: 60,
        slot_size: 0,
    };
    assert!(MultiScheduleGrid::new(view(), date(), Vec::new(), &defaults).is_err());
}

#[test]
fn test_unavailable_run_reaches_grid_end() {
    let closed = schedule("Closed", 12, 12, 15);
    let open = schedule("Open", 9, 17, 15);
    let grid = MultiScheduleGrid::new(view(), date(), vec![closed, open], &GridDefaults::default())
        .expect("valid grid");
    let closed = &grid.schedules()[0];
    assert_eq!(grid.unavailable_slots(closed, 0), grid.slots());
    assert_eq!(grid.unavailable_slots(closed, 5), grid.slots() - 5);
}

#[test_log::test]
fn test_coarse_schedule_occupies_only_overlapped_grid_slots() {
    let mut surgery = schedule("Surgery", 9, 17, 30);
    let operation = add(&mut surgery, at(9, 40), at(10, 0));
    let consults = schedule("Consults", 9, 17, 10);
    let grid = MultiScheduleGrid::new(view(), date(), vec![surgery, consults], &GridDefaults::default())
        .expect("valid grid");
    let surgery = &grid.schedules()[0];
    assert_eq!(grid.slot_size(), 10);

    let slot = |hour, minute| grid.slot(at(hour, minute)).expect("time in grid");
    assert_eq!(grid.availability(surgery, slot(9, 30)), Availability::Free);
    assert_eq!(grid.availability(surgery, slot(9, 40)), Availability::Busy);
    assert_eq!(grid.availability(surgery, slot(9, 50)), Availability::Busy);
    assert_eq!(grid.availability(surgery, slot(10, 0)), Availability::Free);
    assert_eq!(grid.event(surgery, slot(9, 40)), Some(&operation));
    assert_eq!(grid.event_slots(&operation, slot(9, 40)), 2);
}

#[test]
fn test_short_event_on_coarse_schedule_frees_next_grid_slot() {
    let mut surgery = schedule("Surgery", 9, 17, 30);
    let operation = add(&mut surgery, at(9, 0), at(9, 15));
    let consults = schedule("Consults", 9, 17, 15);
    let grid = MultiScheduleGrid::new(view(), date(), vec![surgery, consults], &GridDefaults::default())
        .expect("valid grid");
    let surgery = &grid.schedules()[0];

    let nine = grid.slot(at(9, 0)).expect("09:00 in grid");
    let nine_fifteen = grid.slot(at(9, 15)).expect("09:15 in grid");
    assert_eq!(grid.availability(surgery, nine), Availability::Busy);
    assert_eq!(grid.event_slots(&operation, nine), 1);
    assert_eq!(grid.availability(surgery, nine_fifteen), Availability::Free);
}
