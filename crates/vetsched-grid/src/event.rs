//! Schedule events and the external entities they hang off.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use vetsched_core::types::Reference;

use crate::intersect::TimeSpan;

/// A scheduled occurrence (appointment or task) for one schedule.
///
/// Events are supplied by the query layer and only read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    /// The underlying business act.
    pub act: Reference,
    /// The schedule the event belongs to.
    pub schedule: Reference,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub clinician: Option<Reference>,
    #[serde(default)]
    pub clinician_name: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleEvent {
    #[must_use]
    pub fn new(
        act: Reference,
        schedule: Reference,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
    ) -> Self {
        Self {
            act,
            schedule,
            start_time,
            end_time,
            status: None,
            reason: None,
            event_type: None,
            clinician: None,
            clinician_name: None,
            customer_name: None,
            patient_name: None,
            arrival_time: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    #[must_use]
    pub fn with_clinician(mut self, clinician: Reference, name: impl Into<String>) -> Self {
        self.clinician = Some(clinician);
        self.clinician_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_customer(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_patient(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_arrival_time(mut self, arrival_time: NaiveDateTime) -> Self {
        self.arrival_time = Some(arrival_time);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// ## Summary
    /// Looks up an attribute by name, for display expressions.
    ///
    /// Times are formatted as `HH:MM`. Returns `None` for unknown names and
    /// for attributes the event doesn't have.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "customer" => self.customer_name.clone(),
            "patient" => self.patient_name.clone(),
            "clinician" => self.clinician_name.clone(),
            "status" => self.status.clone(),
            "reason" => self.reason.clone(),
            "eventType" => self.event_type.clone(),
            "notes" => self.notes.clone(),
            "startTime" => Some(self.start_time.format("%H:%M").to_string()),
            "endTime" => Some(self.end_time.format("%H:%M").to_string()),
            "arrivalTime" => self.arrival_time.map(|t| t.format("%H:%M").to_string()),
            _ => None,
        }
    }
}

impl TimeSpan for ScheduleEvent {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    fn end_time(&self) -> NaiveDateTime {
        self.end_time
    }
}

/// Configuration of a schedulable resource (room, clinician).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntity {
    pub reference: Reference,
    pub name: String,
    /// Opening time. Defaults apply when absent.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Closing time. Defaults apply when absent.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Slot size in minutes. Defaults apply when absent or zero.
    #[serde(default)]
    pub slot_size: Option<u32>,
}

impl ScheduleEntity {
    #[must_use]
    pub fn new(reference: Reference, name: impl Into<String>) -> Self {
        Self {
            reference,
            name: name.into(),
            start_time: None,
            end_time: None,
            slot_size: None,
        }
    }

    #[must_use]
    pub fn with_hours(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn with_slot_size(mut self, slot_size: u32) -> Self {
        self.slot_size = Some(slot_size);
        self
    }
}

/// A named set of schedules displayed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub reference: Reference,
    pub name: String,
    /// Template for cell text, see [`crate::display::evaluate`].
    #[serde(default)]
    pub display_expression: Option<String>,
    #[serde(default)]
    pub display_notes: bool,
}

impl ScheduleView {
    #[must_use]
    pub fn new(reference: Reference, name: impl Into<String>) -> Self {
        Self {
            reference,
            name: name.into(),
            display_expression: None,
            display_notes: false,
        }
    }

    #[must_use]
    pub fn with_display_expression(mut self, expression: impl Into<String>) -> Self {
        self.display_expression = Some(expression.into());
        self
    }

    #[must_use]
    pub fn with_display_notes(mut self, display_notes: bool) -> Self {
        self.display_notes = display_notes;
        self
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .expect("valid time")
    }

    #[test]
    fn test_field_lookup() {
        let event = ScheduleEvent::new(
            Reference::generate(),
            Reference::generate(),
            at(10, 0),
            at(10, 30),
        )
        .with_customer("J Smith")
        .with_patient("Fido")
        .with_status("PENDING");

        assert_eq!(event.field("customer").as_deref(), Some("J Smith"));
        assert_eq!(event.field("patient").as_deref(), Some("Fido"));
        assert_eq!(event.field("status").as_deref(), Some("PENDING"));
        assert_eq!(event.field("startTime").as_deref(), Some("10:00"));
        assert_eq!(event.field("endTime").as_deref(), Some("10:30"));
        assert!(event.field("reason").is_none());
        assert!(event.field("nonsense").is_none());
    }

    #[test]
    fn test_event_deserializes_with_optional_attributes_missing() {
        let json = r#"{
            "act": "550e8400-e29b-41d4-a716-446655440000",
            "schedule": "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
            "startTime": "2026-03-02T10:00:00",
            "endTime": "2026-03-02T10:30:00",
            "patientName": "Rex"
        }"#;
        let event: ScheduleEvent = serde_json::from_str(json).expect("deserialize");
        assert_eq!(event.start_time, at(10, 0));
        assert_eq!(event.patient_name.as_deref(), Some("Rex"));
        assert!(event.clinician.is_none());
        assert!(event.arrival_time.is_none());
    }

    #[test]
    fn test_entity_deserializes_hours() {
        let json = r#"{
            "reference": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Consult Room 1",
            "startTime": "09:00:00",
            "endTime": "17:00:00",
            "slotSize": 15
        }"#;
        let entity: ScheduleEntity = serde_json::from_str(json).expect("deserialize");
        assert_eq!(entity.start_time, NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(entity.slot_size, Some(15));
    }
}
