use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use vetsched_core::types::Reference;

use super::Cell;
use crate::display;
use crate::event::ScheduleEvent;
use crate::grid::{Availability, ScheduleEventGrid};
use crate::schedule::Schedule;
use crate::slot::format_minutes;

/// Determines how cells are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Highlight {
    #[default]
    EventType,
    Clinician,
    Status,
}

/// Change notifications sent to table listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableModelEvent {
    /// A single cell needs redrawing.
    CellUpdated { column: usize, row: usize },
    /// Every cell needs redrawing.
    DataChanged,
}

/// Text to display for an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellLabel {
    pub text: String,
    /// Notes for a popup, present only if the view displays notes.
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
struct Column {
    heading: String,
    /// Index into the grid's schedules.
    schedule: Option<usize>,
}

type Listener = Box<dyn FnMut(&TableModelEvent)>;

/// ## Summary
/// Adapts a [`ScheduleEventGrid`] to a table.
///
/// With schedule columns, column `0` holds slot times, columns `1..=n` are
/// the schedules and each row is a slot. Otherwise column `0` holds the
/// schedule names, each row is a schedule and columns `1..=slots` are slots.
///
/// The model tracks a selected cell and, independently, a cell marked for
/// cut or copy. Changing either notifies listeners for the old and new cell
/// only.
pub struct ScheduleTableModel {
    grid: Box<dyn ScheduleEventGrid>,
    schedule_columns: bool,
    columns: Vec<Column>,
    clinician: Option<Reference>,
    selected: Option<Cell>,
    marked: Option<Cell>,
    is_cut: bool,
    highlight: Highlight,
    expression: Option<String>,
    display_notes: bool,
    listeners: Vec<Listener>,
}

impl ScheduleTableModel {
    #[must_use]
    pub fn new(grid: Box<dyn ScheduleEventGrid>, schedule_columns: bool) -> Self {
        let view = grid.schedule_view();
        let expression = view
            .display_expression
            .clone()
            .filter(|expression| !expression.trim().is_empty());
        let display_notes = view.display_notes;
        let columns = create_columns(grid.as_ref(), schedule_columns);
        tracing::debug!(
            view = %view.name,
            schedule_columns,
            columns = columns.len(),
            "Created schedule table model"
        );
        Self {
            grid,
            schedule_columns,
            columns,
            clinician: None,
            selected: None,
            marked: None,
            is_cut: false,
            highlight: Highlight::default(),
            expression,
            display_notes,
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &dyn ScheduleEventGrid {
        self.grid.as_ref()
    }

    #[must_use]
    pub fn schedules(&self) -> &[Schedule] {
        self.grid.schedules()
    }

    /// Determines if schedules are displayed on the columns.
    #[must_use]
    pub const fn schedule_columns(&self) -> bool {
        self.schedule_columns
    }

    /// Determines if the view has a single schedule.
    #[must_use]
    pub fn is_single_schedule_view(&self) -> bool {
        self.schedules().len() == 1
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        if self.schedule_columns {
            self.grid.slots()
        } else {
            self.schedules().len()
        }
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(|c| c.heading.as_str())
    }

    /// Returns the slot a cell displays, or `None` for header cells.
    #[must_use]
    pub fn slot_of(&self, column: usize, row: usize) -> Option<usize> {
        let slot = if self.schedule_columns {
            row
        } else {
            column.checked_sub(1)?
        };
        (slot < self.grid.slots()).then_some(slot)
    }

    /// Returns the schedule at a column and row, or `None`.
    #[must_use]
    pub fn schedule(&self, column: usize, row: usize) -> Option<&Schedule> {
        if self.schedule_columns {
            let index = self.columns.get(column)?.schedule?;
            self.schedules().get(index)
        } else {
            self.schedules().get(row)
        }
    }

    #[must_use]
    pub fn schedule_at(&self, cell: Cell) -> Option<&Schedule> {
        self.schedule(cell.column(), cell.row())
    }

    /// Returns the event at a column and row, or `None`.
    #[must_use]
    pub fn event_at(&self, column: usize, row: usize) -> Option<&ScheduleEvent> {
        let slot = self.slot_of(column, row)?;
        let schedule = self.schedule(column, row)?;
        self.grid.event(schedule, slot)
    }

    #[must_use]
    pub fn event(&self, cell: Cell) -> Option<&ScheduleEvent> {
        self.event_at(cell.column(), cell.row())
    }

    /// Returns the availability of a column and row. Header cells are unavailable.
    #[must_use]
    pub fn availability_at(&self, column: usize, row: usize) -> Availability {
        match (self.schedule(column, row), self.slot_of(column, row)) {
            (Some(schedule), Some(slot)) => self.grid.availability(schedule, slot),
            _ => Availability::Unavailable,
        }
    }

    #[must_use]
    pub fn availability(&self, cell: Cell) -> Availability {
        self.availability_at(cell.column(), cell.row())
    }

    /// Returns the time a cell starts at for a schedule, or `None`.
    #[must_use]
    pub fn start_time(&self, schedule: &Schedule, cell: Cell) -> Option<NaiveDateTime> {
        let slot = self.slot_of(cell.column(), cell.row())?;
        self.grid.start_time(schedule, slot)
    }

    /// ## Summary
    /// Returns how many slots the content of a cell spans.
    ///
    /// An event spans the slots it occupies; an unavailable cell spans the
    /// run of unavailable slots after it. Anything else spans one slot, and
    /// header cells none.
    #[must_use]
    pub fn span(&self, column: usize, row: usize) -> usize {
        let (Some(schedule), Some(slot)) = (self.schedule(column, row), self.slot_of(column, row))
        else {
            return 0;
        };
        if let Some(event) = self.grid.event(schedule, slot) {
            return self.grid.event_slots(event, slot).max(1);
        }
        match self.grid.availability(schedule, slot) {
            Availability::Unavailable => self.grid.unavailable_slots(schedule, slot),
            Availability::Free | Availability::Busy => 1,
        }
    }

    /// Returns the slot displaying an event of a schedule, or `None`.
    #[must_use]
    pub fn slot_for_event(&self, schedule: &Schedule, event_ref: &Reference) -> Option<usize> {
        let event = schedule.event_by_act(event_ref)?;
        let first = if event.start_time.date() < self.grid.date() {
            0
        } else {
            self.grid.slot(event.start_time)?
        };
        (first..self.grid.slots()).find(|&slot| {
            self.grid
                .event(schedule, slot)
                .is_some_and(|e| e.act == *event_ref)
        })
    }

    /// Returns the cell displaying an event of a schedule, or `None`.
    #[must_use]
    pub fn cell_for_event(&self, schedule_ref: &Reference, event_ref: &Reference) -> Option<Cell> {
        self.schedule_positions(schedule_ref)
            .find_map(|(position, schedule)| {
                let slot = self.slot_for_event(schedule, event_ref)?;
                Some(self.cell(position, slot))
            })
    }

    /// Returns the cell of a schedule at a time, or `None`.
    #[must_use]
    pub fn cell_for_time(&self, schedule_ref: &Reference, time: NaiveDateTime) -> Option<Cell> {
        let slot = self.grid.slot(time)?;
        let (position, _) = self.schedule_positions(schedule_ref).next()?;
        Some(self.cell(position, slot))
    }

    /// Sets the clinician to display events for; `None` displays all.
    pub fn set_clinician(&mut self, clinician: Option<Reference>) {
        self.clinician = clinician;
        self.fire(TableModelEvent::DataChanged);
    }

    #[must_use]
    pub const fn clinician(&self) -> Option<Reference> {
        self.clinician
    }

    /// Determines if an event passes the clinician filter.
    #[must_use]
    pub fn is_displayed(&self, event: &ScheduleEvent) -> bool {
        self.clinician.is_none() || event.clinician == self.clinician
    }

    /// Sets the selected cell, or clears the selection.
    pub fn set_selected(&mut self, cell: Option<Cell>) {
        let old = std::mem::replace(&mut self.selected, cell);
        tracing::trace!(old = ?old, new = ?cell, "Selection changed");
        self.fire_cells(old, cell);
    }

    #[must_use]
    pub const fn selected(&self) -> Option<Cell> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, column: usize, row: usize) -> bool {
        self.selected.is_some_and(|cell| cell.is_at(column, row))
    }

    /// ## Summary
    /// Marks a cell for cutting (`is_cut`) or copying, or clears the mark.
    ///
    /// The cut flag is stored even when clearing.
    pub fn set_marked(&mut self, cell: Option<Cell>, is_cut: bool) {
        let old = std::mem::replace(&mut self.marked, cell);
        self.is_cut = is_cut;
        tracing::trace!(old = ?old, new = ?cell, is_cut, "Mark changed");
        self.fire_cells(old, cell);
    }

    #[must_use]
    pub const fn marked(&self) -> Option<Cell> {
        self.marked
    }

    #[must_use]
    pub fn is_marked(&self, column: usize, row: usize) -> bool {
        self.marked.is_some_and(|cell| cell.is_at(column, row))
    }

    /// Determines if the marked cell is being cut, rather than copied.
    #[must_use]
    pub const fn is_cut(&self) -> bool {
        self.is_cut
    }

    pub fn set_highlight(&mut self, highlight: Highlight) {
        self.highlight = highlight;
        self.fire(TableModelEvent::DataChanged);
    }

    #[must_use]
    pub const fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Returns the value the current highlight colours an event by.
    #[must_use]
    pub fn highlight_key<'a>(&self, event: &'a ScheduleEvent) -> Option<&'a str> {
        match self.highlight {
            Highlight::EventType => event.event_type.as_deref(),
            Highlight::Clinician => event.clinician_name.as_deref(),
            Highlight::Status => event.status.as_deref(),
        }
    }

    /// ## Summary
    /// Returns the text to display for an event.
    ///
    /// Uses the view's display expression if it has one, otherwise the
    /// customer and patient names and the reason.
    #[must_use]
    pub fn label(&self, event: &ScheduleEvent, now: NaiveDateTime) -> CellLabel {
        let text = match &self.expression {
            Some(expression) => {
                let schedule = self
                    .schedules()
                    .iter()
                    .find(|schedule| schedule.reference() == event.schedule)
                    .map(Schedule::name);
                display::evaluate(expression, event, schedule, now)
            }
            None => default_text(event),
        };
        let notes = if self.display_notes {
            event.notes.clone()
        } else {
            None
        };
        CellLabel { text, notes }
    }

    pub fn add_listener(&mut self, listener: impl FnMut(&TableModelEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Yields the table position (column or row) of each occurrence of a schedule.
    fn schedule_positions<'a>(
        &'a self,
        schedule_ref: &'a Reference,
    ) -> Box<dyn Iterator<Item = (usize, &'a Schedule)> + 'a> {
        if self.schedule_columns {
            Box::new(self.columns.iter().enumerate().filter_map(move |(index, column)| {
                let schedule = self.schedules().get(column.schedule?)?;
                (schedule.reference() == *schedule_ref).then_some((index, schedule))
            }))
        } else {
            Box::new(
                self.schedules()
                    .iter()
                    .enumerate()
                    .filter(move |(_, schedule)| schedule.reference() == *schedule_ref),
            )
        }
    }

    fn cell(&self, position: usize, slot: usize) -> Cell {
        if self.schedule_columns {
            Cell::new(position, slot)
        } else {
            Cell::new(slot + 1, position)
        }
    }

    fn fire_cells(&mut self, old: Option<Cell>, new: Option<Cell>) {
        for cell in [old, new].into_iter().flatten() {
            self.fire(TableModelEvent::CellUpdated {
                column: cell.column(),
                row: cell.row(),
            });
        }
    }

    fn fire(&mut self, event: TableModelEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

fn create_columns(grid: &dyn ScheduleEventGrid, schedule_columns: bool) -> Vec<Column> {
    let mut columns = Vec::new();
    if schedule_columns {
        columns.push(Column {
            heading: "Time".to_string(),
            schedule: None,
        });
        columns.extend(grid.schedules().iter().enumerate().map(|(index, schedule)| Column {
            heading: schedule.name().to_string(),
            schedule: Some(index),
        }));
    } else {
        columns.push(Column {
            heading: "Schedule".to_string(),
            schedule: None,
        });
        columns.extend((0..grid.slots()).map(|slot| Column {
            heading: format_minutes(grid.start_mins(slot)),
            schedule: None,
        }));
    }
    columns
}

fn default_text(event: &ScheduleEvent) -> String {
    let names: Vec<&str> = [event.customer_name.as_deref(), event.patient_name.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let mut text = names.join(" - ");
    if let Some(reason) = &event.reason {
        if text.is_empty() {
            text.push_str(reason);
        } else {
            text.push_str(&format!(" ({reason})"));
        }
    }
    text
}
