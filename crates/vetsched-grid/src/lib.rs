//! Appointment scheduling grid.
//!
//! Events for one day are loaded into per-resource [`Schedule`]s, laid out on
//! a shared slot axis by a [`ScheduleEventGrid`], and adapted for tabular
//! display, with selection and cut/copy state, by a [`ScheduleTableModel`].

pub mod browser;
pub mod display;
pub mod error;
pub mod event;
pub mod grid;
pub mod intersect;
pub mod schedule;
pub mod slot;
pub mod table;

pub use browser::{ScheduleBrowser, ScheduleEvents, ScheduleQueryResult};
pub use error::{GridError, GridResult};
pub use event::{ScheduleEntity, ScheduleEvent, ScheduleView};
pub use grid::{Availability, MultiScheduleGrid, ScheduleEventGrid, SingleScheduleGrid};
pub use intersect::{IntersectComparator, Span, TimeSpan};
pub use schedule::Schedule;
pub use table::{Cell, CellLabel, Highlight, ScheduleTableModel, TableModelEvent};
