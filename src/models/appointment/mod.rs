// Appointment module
// Central scheduling entity, mapped from remote store records

use chrono::{DateTime, Duration, Local};

use crate::services::grid::{is_slot_aligned, SLOT_MINUTES};

/// Title shown when an appointment has neither a doctor name nor notes.
pub const FALLBACK_TITLE: &str = "Appointment";

/// A booked appointment on the clinic grid.
///
/// `id` is assigned by the remote store and is `None` only for a draft
/// that has not been confirmed yet; confirmed appointments always carry
/// the server id. `start` is grid-local wall clock, always slot-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub start: DateTime<Local>,
    pub duration_minutes: i64,
    pub notes: Option<String>,
    pub doctor_first_name: Option<String>,
    pub doctor_last_name: Option<String>,
}

impl Appointment {
    /// Create a validated appointment.
    pub fn new(
        patient_id: i64,
        doctor_id: i64,
        start: DateTime<Local>,
        duration_minutes: i64,
    ) -> Result<Self, String> {
        let appointment = Self {
            id: None,
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            start,
            duration_minutes,
            notes: None,
            doctor_first_name: None,
            doctor_last_name: None,
        };
        appointment.validate()?;
        Ok(appointment)
    }

    /// Validate the grid invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_minutes < SLOT_MINUTES {
            return Err(format!(
                "Appointment duration must be at least {} minutes",
                SLOT_MINUTES
            ));
        }

        if self.duration_minutes % SLOT_MINUTES != 0 {
            return Err(format!(
                "Appointment duration must be a multiple of {} minutes",
                SLOT_MINUTES
            ));
        }

        if !is_slot_aligned(self.start) {
            return Err("Appointment start must sit on a grid slot boundary".to_string());
        }

        Ok(())
    }

    /// End of the appointment, derived from start and duration.
    pub fn end(&self) -> DateTime<Local> {
        self.start + Duration::minutes(self.duration_minutes)
    }

    /// Grid label, recomputed from the doctor name and notes.
    ///
    /// Never stored: the title always reflects the current notes and the
    /// currently resolved doctor, so the two cannot drift apart.
    pub fn display_title(&self) -> String {
        let doctor: Vec<&str> = [&self.doctor_first_name, &self.doctor_last_name]
            .into_iter()
            .filter_map(|name| name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty());

        if doctor.is_empty() {
            return notes.unwrap_or(FALLBACK_TITLE).to_string();
        }

        let title = format!("Dr. {}", doctor.join(" "));
        match notes {
            Some(notes) => format!("{} - {}", title, notes),
            None => title,
        }
    }
}
