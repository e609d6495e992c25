use thiserror::Error;
use vetsched_core::types::Reference;

/// Scheduling grid errors
#[derive(Error, Debug)]
pub enum GridError {
    #[error(transparent)]
    CoreError(#[from] vetsched_core::error::CoreError),

    #[error("Event {act} belongs to schedule {event_schedule}, not {schedule}")]
    ForeignEvent {
        act: Reference,
        event_schedule: Reference,
        schedule: Reference,
    },
}

pub type GridResult<T> = std::result::Result<T, GridError>;
