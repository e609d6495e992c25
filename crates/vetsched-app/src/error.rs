use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the command line front end
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    GridError(#[from] vetsched_grid::error::GridError),

    #[error(transparent)]
    CoreError(#[from] vetsched_core::error::CoreError),

    #[error("No input file: pass a path or set input.path")]
    MissingInput,

    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid schedule data: {0}")]
    ParseInput(#[from] serde_json::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
