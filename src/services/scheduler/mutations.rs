// Optimistic mutations: move, resize, create, delete, notes.
//
// Each mutation is a single remote request. Move/resize failures roll the
// grid back by re-fetching the active range; create/delete/notes failures
// leave local state untouched so the user can retry the same action.

use chrono::{DateTime, Local};

use crate::models::appointment::Appointment;
use crate::models::directory::Role;
use crate::services::directory::DirectoryCache;
use crate::services::grid::{self, SLOT_MINUTES};
use crate::services::repository::{AppointmentApi, CreateAppointment};

use super::{Scheduler, SchedulerError};

/// What a move or resize ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The store accepted the edit and the collection was updated in place.
    Committed,
    /// The edit collapsed below one slot; the view was resynchronized
    /// instead of sending anything.
    Reverted,
}

/// Capture state for booking a new appointment from a selected slot.
///
/// Built by [`Scheduler::begin_create`]; the slot start is already
/// snapped and a doctor-role session arrives with its own doctor locked
/// in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDraft {
    pub slot_start: DateTime<Local>,
    pub duration_minutes: i64,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub notes: String,
}

impl<A: AppointmentApi> Scheduler<A> {
    /// Drop an appointment onto a new grid position.
    ///
    /// Both endpoints are snapped before anything else happens; on success
    /// the snapped values replace the local appointment in one step, on
    /// failure the active range is re-fetched and the error surfaced.
    pub fn move_appointment(
        &mut self,
        id: i64,
        raw_start: DateTime<Local>,
        raw_end: DateTime<Local>,
    ) -> Result<MutationOutcome, SchedulerError> {
        self.ensure_editable_view()?;
        self.ensure_known(id)?;

        let start = grid::snap(raw_start);
        let duration_minutes = grid::duration_between(raw_start, raw_end);
        let version = self.range_version;

        match self
            .api
            .update_time_and_duration(id, grid::to_wire_time(start), duration_minutes)
        {
            Ok(()) => {
                self.commit_if_current(version, |appointments| {
                    if let Some(appointment) =
                        appointments.iter_mut().find(|a| a.id == Some(id))
                    {
                        appointment.start = start;
                        appointment.duration_minutes = duration_minutes;
                    }
                });
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.resynchronize_after("move", id, &err);
                Err(err.into())
            }
        }
    }

    /// Drag a resize handle to a new duration (and possibly start).
    ///
    /// A snapped duration below one slot is treated as a no-op edit: the
    /// view is resynchronized and nothing is sent to the store.
    pub fn resize_appointment(
        &mut self,
        id: i64,
        raw_start: DateTime<Local>,
        raw_end: DateTime<Local>,
    ) -> Result<MutationOutcome, SchedulerError> {
        self.ensure_editable_view()?;
        self.ensure_known(id)?;

        let start = grid::snap(raw_start);
        let duration_minutes = grid::duration_between(raw_start, raw_end);

        if duration_minutes < SLOT_MINUTES {
            self.refresh()?;
            return Ok(MutationOutcome::Reverted);
        }

        let version = self.range_version;
        match self
            .api
            .update_time_and_duration(id, grid::to_wire_time(start), duration_minutes)
        {
            Ok(()) => {
                self.commit_if_current(version, |appointments| {
                    if let Some(appointment) =
                        appointments.iter_mut().find(|a| a.id == Some(id))
                    {
                        appointment.start = start;
                        appointment.duration_minutes = duration_minutes;
                    }
                });
                Ok(MutationOutcome::Committed)
            }
            Err(err) => {
                self.resynchronize_after("resize", id, &err);
                Err(err.into())
            }
        }
    }

    /// Open a capture draft for the selected empty slot.
    pub fn begin_create(
        &self,
        raw_start: DateTime<Local>,
    ) -> Result<CreateDraft, SchedulerError> {
        self.ensure_editable_view()?;

        let doctor_id = match self.session().role {
            Role::Doctor => Some(self.session().user_id),
            _ => None,
        };

        Ok(CreateDraft {
            slot_start: grid::snap(raw_start),
            duration_minutes: 30,
            patient_id: None,
            doctor_id,
            notes: String::new(),
        })
    }

    /// Submit a completed capture draft.
    ///
    /// On success the server-assigned id merges with the draft into a new
    /// local appointment (no re-fetch); on failure nothing changes locally
    /// and the caller keeps the draft to retry.
    pub fn submit_create(
        &mut self,
        draft: &CreateDraft,
        directory: &DirectoryCache,
    ) -> Result<i64, SchedulerError> {
        self.ensure_editable_view()?;

        // a doctor-role session books for itself no matter what the draft says
        let doctor_id = match self.session().role {
            Role::Doctor => self.session().user_id,
            _ => draft.doctor_id.ok_or_else(|| {
                SchedulerError::Validation("select a doctor before booking".to_string())
            })?,
        };

        let patient_id = draft.patient_id.ok_or_else(|| {
            SchedulerError::Validation("select a patient before booking".to_string())
        })?;

        if !grid::is_slot_aligned(draft.slot_start) {
            return Err(SchedulerError::Validation(
                "appointment start must sit on a grid slot boundary".to_string(),
            ));
        }

        if draft.duration_minutes < SLOT_MINUTES
            || draft.duration_minutes % SLOT_MINUTES != 0
            || draft.duration_minutes > self.max_duration_minutes
        {
            return Err(SchedulerError::Validation(format!(
                "duration must be a multiple of {} minutes up to {}",
                SLOT_MINUTES, self.max_duration_minutes
            )));
        }

        let version = self.range_version;
        let id = self.api.create(&CreateAppointment {
            patient_id,
            doctor_id,
            wire_start: grid::to_wire_time(draft.slot_start),
            duration_minutes: draft.duration_minutes,
            notes: draft.notes.clone(),
        })?;

        // the create echo rides the wire clock, so the snapped local draft
        // stays authoritative for everything but the assigned id
        let doctor = directory.doctor(doctor_id);
        let notes = Some(draft.notes.clone()).filter(|n| !n.trim().is_empty());
        let appointment = Appointment {
            id: Some(id),
            patient_id: Some(patient_id),
            doctor_id: Some(doctor_id),
            start: draft.slot_start,
            duration_minutes: draft.duration_minutes,
            notes,
            doctor_first_name: doctor.map(|d| d.first_name.clone()),
            doctor_last_name: doctor.map(|d| d.last_name.clone()),
        };

        self.commit_if_current(version, |appointments| {
            appointments.push(appointment);
        });

        Ok(id)
    }

    /// Cancel an appointment. Callers confirm with the user first; this
    /// goes straight to the store.
    pub fn delete_appointment(&mut self, id: i64) -> Result<(), SchedulerError> {
        self.ensure_known(id)?;

        let version = self.range_version;
        self.api.delete(id)?;

        self.commit_if_current(version, |appointments| {
            appointments.retain(|a| a.id != Some(id));
        });
        Ok(())
    }

    /// Replace an appointment's notes. The display title re-derives from
    /// the stored notes, so it follows automatically.
    pub fn update_notes(&mut self, id: i64, notes: &str) -> Result<(), SchedulerError> {
        self.ensure_known(id)?;

        let version = self.range_version;
        self.api.update_notes(id, notes)?;

        let stored = Some(notes.to_string()).filter(|n| !n.trim().is_empty());
        self.commit_if_current(version, |appointments| {
            if let Some(appointment) = appointments.iter_mut().find(|a| a.id == Some(id)) {
                appointment.notes = stored;
            }
        });
        Ok(())
    }
}
