// Wire shapes for the appointment store API.
// Requests use camelCase field names, responses snake_case.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::appointment::Appointment;

/// Fallback when a record arrives without `duration_minutes`.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// Every endpoint wraps its payload in this envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One appointment as the store returns it from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: i64,
    pub appointment_time: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub doctor_first_name: Option<String>,
    #[serde(default)]
    pub doctor_last_name: Option<String>,
}

impl AppointmentRecord {
    /// Map a wire record into the typed entity.
    ///
    /// `appointment_time` is taken as-is (no reverse wire-clock shift) and
    /// a missing duration defaults to thirty minutes.
    pub fn into_appointment(self) -> Result<Appointment, String> {
        let start = parse_wire_time(&self.appointment_time)?;
        Ok(Appointment {
            id: Some(self.appointment_id),
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            start,
            duration_minutes: self.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            notes: self.notes,
            doctor_first_name: self.doctor_first_name,
            doctor_last_name: self.doctor_last_name,
        })
    }
}

/// Create-response payload; only the assigned id is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedRecord {
    pub appointment_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody<'a> {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_time: String,
    pub duration: i64,
    pub notes: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDurationBody {
    pub appointment_time: String,
    pub duration: i64,
}

#[derive(Debug, Serialize)]
pub struct NotesBody<'a> {
    pub notes: &'a str,
}

/// Serialize a wire-clock timestamp the way the store expects it.
pub fn format_wire_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a wire timestamp into the grid-local representation.
///
/// Offset-carrying timestamps keep their instant; naive ones are read as
/// grid-local wall clock. No clinic-offset correction happens on reads.
pub fn parse_wire_time(value: &str) -> Result<DateTime<Local>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| naive.and_local_timezone(Local).single())
        .ok_or_else(|| format!("unparseable appointment_time '{}'", value))
}
