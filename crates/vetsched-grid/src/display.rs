//! Display expressions: `{field}` templates rendered against an event.

use chrono::NaiveDateTime;

use crate::event::ScheduleEvent;

/// ## Summary
/// Renders `expression`, replacing each `{field}` placeholder with the
/// event attribute of that name.
///
/// `{schedule}` renders `schedule`, and `{waiting}` the time elapsed since
/// the event's arrival, as `H:MM`. Unknown or missing attributes render
/// empty. An unclosed `{` is copied as is.
#[must_use]
pub fn evaluate(
    expression: &str,
    event: &ScheduleEvent,
    schedule: Option<&str>,
    now: NaiveDateTime,
) -> String {
    let mut result = String::with_capacity(expression.len());
    let mut rest = expression;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            result.push_str(&rest[open..]);
            return result;
        };
        let name = after[..close].trim();
        let value = match name {
            "schedule" => schedule.map(str::to_string),
            "waiting" => event.arrival_time.map(|arrival| waiting_time(arrival, now)),
            _ => event.field(name),
        };
        if value.is_none() {
            tracing::trace!(field = name, "Display field has no value");
        }
        result.push_str(value.as_deref().unwrap_or_default());
        rest = &after[close + 1..];
    }
    result.push_str(rest);
    result
}

/// Formats the time elapsed between `arrival` and `now` as `H:MM`. Arrivals
/// after `now` count as no wait.
#[must_use]
pub fn waiting_time(arrival: NaiveDateTime, now: NaiveDateTime) -> String {
    let minutes = (now - arrival).num_minutes().max(0);
    format!("{}:{:02}", minutes / 60, minutes % 60)
}
