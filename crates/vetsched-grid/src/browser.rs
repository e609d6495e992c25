//! Query results and the interaction state that survives re-querying.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vetsched_core::config::GridDefaults;
use vetsched_core::types::Reference;

use crate::error::{GridError, GridResult};
use crate::event::{ScheduleEntity, ScheduleEvent, ScheduleView};
use crate::grid::{Availability, MultiScheduleGrid, ScheduleEventGrid, SingleScheduleGrid};
use crate::schedule::Schedule;
use crate::table::{Cell, Highlight, ScheduleTableModel};

/// A schedule and its events for the queried date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvents {
    pub schedule: ScheduleEntity,
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
}

impl ScheduleEvents {
    #[must_use]
    pub const fn new(schedule: ScheduleEntity, events: Vec<ScheduleEvent>) -> Self {
        Self { schedule, events }
    }
}

/// The schedules of a view on a date, as returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQueryResult {
    pub view: ScheduleView,
    pub date: NaiveDate,
    pub schedules: Vec<ScheduleEvents>,
}

/// ## Summary
/// Rebuilds the table model for each query, carrying the selected and
/// marked events across.
///
/// After a query the previous cell is reselected if the schedules and date
/// are unchanged and the cell shows the same event, or showed none. The
/// marked event is located again by reference.
pub struct ScheduleBrowser {
    defaults: GridDefaults,
    schedule_columns: bool,
    results: Vec<ScheduleEvents>,
    model: Option<ScheduleTableModel>,
    selected: Option<ScheduleEvent>,
    selected_time: Option<NaiveDateTime>,
    selected_schedule: Option<Reference>,
    marked: Option<ScheduleEvent>,
    clinician: Option<Reference>,
    highlight: Highlight,
}

impl ScheduleBrowser {
    #[must_use]
    pub const fn new(defaults: GridDefaults, schedule_columns: bool) -> Self {
        Self {
            defaults,
            schedule_columns,
            results: Vec::new(),
            model: None,
            selected: None,
            selected_time: None,
            selected_schedule: None,
            marked: None,
            clinician: None,
            highlight: Highlight::EventType,
        }
    }

    /// Returns the table model, or `None` before the first query.
    #[must_use]
    pub const fn model(&self) -> Option<&ScheduleTableModel> {
        self.model.as_ref()
    }

    /// Returns the model for registering listeners.
    pub fn model_mut(&mut self) -> Option<&mut ScheduleTableModel> {
        self.model.as_mut()
    }

    /// Returns the results of the last query.
    #[must_use]
    pub fn results(&self) -> &[ScheduleEvents] {
        &self.results
    }

    /// Returns every event of the last query.
    #[must_use = "iterators are lazy"]
    pub fn events(&self) -> impl Iterator<Item = &ScheduleEvent> {
        self.results.iter().flat_map(|result| &result.events)
    }

    /// Returns the event for an act from the last query, or `None`.
    #[must_use]
    pub fn event_for_act(&self, act: &Reference) -> Option<&ScheduleEvent> {
        self.events().find(|event| event.act == *act)
    }

    /// ## Summary
    /// Loads the results of a query.
    ///
    /// ## Errors
    /// Returns an error if a schedule's configuration is invalid, or an
    /// event belongs to another schedule.
    pub fn query_result(&mut self, result: ScheduleQueryResult) -> GridResult<()> {
        self.query(result.view, result.date, result.schedules)
    }

    /// ## Summary
    /// Lays out the schedules of a view for a date and rebuilds the model.
    ///
    /// A single schedule uses a [`SingleScheduleGrid`], anything else a
    /// [`MultiScheduleGrid`].
    ///
    /// ## Errors
    /// Returns an error if a schedule's configuration is invalid, or an
    /// event belongs to another schedule. The browser is unchanged on error.
    pub fn query(
        &mut self,
        view: ScheduleView,
        date: NaiveDate,
        results: Vec<ScheduleEvents>,
    ) -> GridResult<()> {
        let schedules = results
            .iter()
            .map(|result| self.load(result))
            .collect::<GridResult<Vec<_>>>()?;

        let same_schedules = self
            .results
            .iter()
            .map(|result| result.schedule.reference)
            .eq(results.iter().map(|result| result.schedule.reference));

        let grid: Box<dyn ScheduleEventGrid> = match <[Schedule; 1]>::try_from(schedules) {
            Ok([schedule]) => Box::new(SingleScheduleGrid::new(view, date, schedule)),
            Err(schedules) => Box::new(MultiScheduleGrid::new(
                view,
                date,
                schedules,
                &self.defaults,
            )?),
        };

        let mut last_cell = None;
        let mut last_event = None;
        let mut is_cut = true;
        if let Some(model) = &self.model {
            last_cell = model.selected();
            last_event = last_cell.and_then(|cell| model.event(cell)).map(|e| e.act);
            is_cut = model.is_cut();
        }

        let mut model = ScheduleTableModel::new(grid, self.schedule_columns);
        model.set_clinician(self.clinician);
        model.set_highlight(self.highlight);
        self.model = Some(model);
        self.results = results;

        let reselect = last_cell.filter(|cell| {
            same_schedules
                && self.selected_time.map(|time| time.date()) == Some(date)
                && self.model.as_ref().is_some_and(|model| {
                    cell.column() < model.column_count()
                        && cell.row() < model.row_count()
                        && (last_event.is_none()
                            || model.event(*cell).map(|e| e.act) == last_event)
                })
        });
        tracing::debug!(
            %date,
            schedules = self.results.len(),
            same_schedules,
            reselected = reselect.is_some(),
            "Queried schedules"
        );
        match reselect {
            Some(cell) => {
                if let Some(model) = &mut self.model {
                    model.set_selected(Some(cell));
                }
            }
            None => self.set_selected(None),
        }
        self.update_marked(is_cut);
        Ok(())
    }

    /// Returns the selected event, or `None`.
    #[must_use]
    pub const fn selected(&self) -> Option<&ScheduleEvent> {
        self.selected.as_ref()
    }

    /// Returns the time of the selected cell, or `None`.
    #[must_use]
    pub const fn selected_time(&self) -> Option<NaiveDateTime> {
        self.selected_time
    }

    /// Returns the schedule of the selected cell, or `None`.
    #[must_use]
    pub const fn selected_schedule(&self) -> Option<Reference> {
        self.selected_schedule
    }

    /// ## Summary
    /// Selects the cell displaying an event, or clears the selection.
    ///
    /// The selection is cleared if the event isn't displayed.
    pub fn set_selected(&mut self, event: Option<ScheduleEvent>) {
        let cell = event.as_ref().and_then(|event| {
            self.model
                .as_ref()?
                .cell_for_event(&event.schedule, &event.act)
        });
        match (cell, event) {
            (Some(cell), Some(event)) => {
                self.selected_time = Some(event.start_time);
                self.selected_schedule = Some(event.schedule);
                self.selected = Some(event);
                if let Some(model) = &mut self.model {
                    model.set_selected(Some(cell));
                }
            }
            _ => {
                self.selected = None;
                self.selected_time = None;
                self.selected_schedule = None;
                if let Some(model) = &mut self.model {
                    model.set_selected(None);
                }
            }
        }
    }

    /// ## Summary
    /// Selects a cell, as when clicked.
    ///
    /// The selected time and schedule are those of the cell, unless it is
    /// unavailable.
    pub fn select_cell(&mut self, cell: Cell) {
        let Some(model) = &mut self.model else {
            return;
        };
        model.set_selected(Some(cell));
        self.selected = model.event(cell).cloned();
        let target = (model.availability(cell) != Availability::Unavailable)
            .then(|| model.schedule_at(cell))
            .flatten()
            .map(|schedule| (model.start_time(schedule, cell), schedule.reference()));
        match target {
            Some((time, schedule)) => {
                self.selected_time = time;
                self.selected_schedule = Some(schedule);
            }
            None => {
                self.selected_time = None;
                self.selected_schedule = None;
            }
        }
    }

    /// Returns the event marked to be cut or copied, or `None`.
    #[must_use]
    pub const fn marked(&self) -> Option<&ScheduleEvent> {
        self.marked.as_ref()
    }

    /// Marks an event to be cut (`is_cut`) or copied, or clears the mark.
    pub fn set_marked(&mut self, event: Option<ScheduleEvent>, is_cut: bool) {
        self.marked = event;
        self.update_marked(is_cut);
    }

    /// Clears the mark, keeping the cut flag.
    pub fn clear_marked(&mut self) {
        self.set_marked(None, self.is_cut());
    }

    /// Determines if the marked event is being cut, rather than copied.
    #[must_use]
    pub fn is_cut(&self) -> bool {
        self.model.as_ref().is_some_and(ScheduleTableModel::is_cut)
    }

    /// Displays events for a clinician only; `None` displays all.
    pub fn set_clinician(&mut self, clinician: Option<Reference>) {
        self.clinician = clinician;
        if let Some(model) = &mut self.model {
            model.set_clinician(clinician);
        }
    }

    pub fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
        if let Some(model) = &mut self.model {
            model.set_highlight(highlight);
        }
    }

    fn load(&self, result: &ScheduleEvents) -> GridResult<Schedule> {
        let mut schedule = Schedule::from_entity(result.schedule.clone(), &self.defaults)?;
        for event in &result.events {
            if event.schedule != schedule.reference() {
                return Err(GridError::ForeignEvent {
                    act: event.act,
                    event_schedule: event.schedule,
                    schedule: schedule.reference(),
                });
            }
            schedule.add_event(event.clone());
        }
        Ok(schedule)
    }

    fn update_marked(&mut self, is_cut: bool) {
        let Some(model) = &mut self.model else {
            return;
        };
        let cell = self
            .marked
            .as_ref()
            .and_then(|event| model.cell_for_event(&event.schedule, &event.act));
        model.set_marked(cell, is_cut);
    }
}

#[cfg(test)]
#[path = "browser_tests.rs"]
mod tests;
