use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Slot size must be greater than zero, got {0}")]
    InvalidSlotSize(u32),

    #[error("Working hours are inverted: opens at minute {start_mins}, closes at minute {end_mins}")]
    InvalidHours { start_mins: u32, end_mins: u32 },

    #[error("Minutes from midnight out of range: {0}")]
    MinutesOutOfRange(u32),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
