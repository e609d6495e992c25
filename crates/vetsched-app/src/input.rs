use std::path::Path;

use vetsched_grid::ScheduleQueryResult;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a query result from a JSON file.
///
/// ## Errors
/// Returns an error if the file can't be read or doesn't hold a query result.
pub fn load_query(path: &Path) -> AppResult<ScheduleQueryResult> {
    let source = std::fs::read_to_string(path).map_err(|source| AppError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let result = parse_query(&source)?;
    tracing::debug!(
        path = %path.display(),
        view = %result.view.name,
        date = %result.date,
        schedules = result.schedules.len(),
        "Loaded schedule data"
    );
    Ok(result)
}

/// ## Summary
/// Parses a query result from JSON.
///
/// ## Errors
/// Returns an error if the JSON doesn't describe a query result.
pub fn parse_query(source: &str) -> AppResult<ScheduleQueryResult> {
    Ok(serde_json::from_str(source)?)
}
