//! Tabular presentation of a schedule grid, with selection and cut/copy state.

mod cell;
mod model;


pub use cell::Cell;
pub use model::{CellLabel, Highlight, ScheduleTableModel, TableModelEvent};
