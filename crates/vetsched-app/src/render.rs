//! Plain text rendering of a schedule table.

use chrono::NaiveDateTime;
use vetsched_grid::slot::format_minutes;
use vetsched_grid::{Availability, ScheduleTableModel};

const CONTINUED: &str = "|";
const CLOSED: &str = "-";

/// ## Summary
/// Returns the text of a cell.
///
/// Events show their label on the cell they start in, later cells they
/// occupy show `|`. Unavailable cells show `-` and free cells nothing.
/// Events hidden by the clinician filter show as free.
#[must_use]
pub fn cell_text(model: &ScheduleTableModel, column: usize, row: usize, now: NaiveDateTime) -> String {
    if column == 0 {
        return if model.schedule_columns() {
            format_minutes(model.grid().start_mins(row))
        } else {
            model
                .schedule(column, row)
                .map(|schedule| schedule.name().to_string())
                .unwrap_or_default()
        };
    }
    if let Some(event) = model.event_at(column, row) {
        if !model.is_displayed(event) {
            return String::new();
        }
        let label = model.label(event, now);
        return match label.notes {
            Some(notes) if !notes.is_empty() => format!("{} [{notes}]", label.text),
            _ => label.text,
        };
    }
    match model.availability_at(column, row) {
        Availability::Busy => CONTINUED.to_string(),
        Availability::Unavailable => CLOSED.to_string(),
        Availability::Free => String::new(),
    }
}

/// Renders the whole table, with headings, as aligned columns. The selected
/// cell is prefixed with `>` and the marked cell with `*`.
#[must_use]
pub fn render_table(model: &ScheduleTableModel, now: NaiveDateTime) -> String {
    let columns = model.column_count();
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(model.row_count() + 1);
    rows.push(
        (0..columns)
            .map(|column| model.column_name(column).unwrap_or_default().to_string())
            .collect(),
    );
    for row in 0..model.row_count() {
        rows.push(
            (0..columns)
                .map(|column| {
                    let text = cell_text(model, column, row, now);
                    if model.is_selected(column, row) {
                        format!(">{text}")
                    } else if model.is_marked(column, row) {
                        format!("*{text}")
                    } else {
                        text
                    }
                })
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            rows.iter()
                .map(|cells| cells[column].chars().count())
                .max()
                .unwrap_or_default()
        })
        .collect();

    rows.iter()
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use vetsched_core::config::GridDefaults;
    use vetsched_core::types::Reference;
    use vetsched_grid::{
        Cell, MultiScheduleGrid, Schedule, ScheduleEntity, ScheduleEvent, ScheduleView,
    };

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid time")
    }

    /// Room 1 open 09:00-10:00 with a 09:00-09:30 appointment; Room 2 open 09:30-10:00.
    fn model(schedule_columns: bool) -> ScheduleTableModel {
        let mut room1 = Schedule::new(
            ScheduleEntity::new(Reference::generate(), "Room 1"),
            Some(9 * 60),
            Some(10 * 60),
            15,
        )
        .expect("valid schedule");
        room1.add_event(
            ScheduleEvent::new(Reference::generate(), room1.reference(), at(9, 0), at(9, 30))
                .with_customer("J Smith")
                .with_patient("Fido"),
        );
        let room2 = Schedule::new(
            ScheduleEntity::new(Reference::generate(), "Room 2"),
            Some(9 * 60 + 30),
            Some(10 * 60),
            15,
        )
        .expect("valid schedule");
        let grid = MultiScheduleGrid::new(
            ScheduleView::new(Reference::generate(), "Consults"),
            at(0, 0).date(),
            vec![room1, room2],
            &GridDefaults::default(),
        )
        .expect("valid grid");
        ScheduleTableModel::new(Box::new(grid), schedule_columns)
    }

    #[test]
    fn test_cell_text() {
        let model = model(true);
        assert_eq!(cell_text(&model, 0, 1, at(8, 0)), "09:15");
        assert_eq!(cell_text(&model, 1, 0, at(8, 0)), "J Smith - Fido");
        assert_eq!(cell_text(&model, 1, 1, at(8, 0)), "|");
        assert_eq!(cell_text(&model, 1, 2, at(8, 0)), "");
        assert_eq!(cell_text(&model, 2, 0, at(8, 0)), "-");
    }

    #[test]
    fn test_hidden_event_renders_free() {
        let mut model = model(true);
        model.set_clinician(Some(Reference::generate()));
        assert_eq!(cell_text(&model, 1, 0, at(8, 0)), "");
    }

    #[test_log::test]
    fn test_render_table() {
        let mut model = model(true);
        model.set_selected(Some(Cell::new(2, 3)));
        let expected = [
            "Time  | Room 1         | Room 2",
            "09:00 | J Smith - Fido | -",
            "09:15 | |              | -",
            "09:30 |                |",
            "09:45 |                | >",
        ]
        .join("\n");
        assert_eq!(render_table(&model, at(8, 0)), expected);
    }

    #[test]
    fn test_render_schedule_rows() {
        let model = model(false);
        let text = render_table(&model, at(8, 0));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Schedule | 09:00"));
        assert!(lines[2].starts_with("Room 2   | -"));
    }
}
