//! Mutation coordination between the on-screen grid and the remote store.
//!
//! The scheduler owns the local appointment collection and the view
//! context. Edits are applied optimistically and confirmed by the store;
//! when the store refuses a move or resize, the whole active range is
//! re-fetched so the grid snaps back to server truth. The collection is
//! always a window: changing the view mode, anchor, explicit range, or
//! doctor filter replaces it wholesale, never patches it.

pub mod mutations;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::appointment::Appointment;
use crate::models::directory::{Role, SessionUser};
use crate::models::view_context::{DoctorFilter, ViewContext, ViewMode};
use crate::services::range::{resolve_context_range, DateRange};
use crate::services::repository::{ApiError, AppointmentApi};

pub use mutations::{CreateDraft, MutationOutcome};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// A local precondition failed; no request was sent to the store.
    #[error("{0}")]
    Validation(String),
    /// The store refused or never received the request.
    #[error(transparent)]
    Remote(#[from] ApiError),
}

/// Coordinates the grid's appointment collection against the remote store.
pub struct Scheduler<A: AppointmentApi> {
    api: A,
    session: SessionUser,
    ctx: ViewContext,
    appointments: Vec<Appointment>,
    /// Bumped on every re-fetch; a mutation only commits its optimistic
    /// values when the version it captured is still current, so a newer
    /// snapshot always wins over a stale response.
    range_version: u64,
    max_duration_minutes: i64,
}

impl<A: AppointmentApi> Scheduler<A> {
    /// Build a scheduler for one session. A doctor-role session starts
    /// pinned to its own appointments.
    pub fn new(api: A, session: SessionUser, today: NaiveDate, max_duration_minutes: i64) -> Self {
        let mut ctx = ViewContext::new(today);
        if session.role == Role::Doctor {
            ctx.doctor_filter = DoctorFilter::Doctor(session.user_id);
        }

        Self {
            api,
            session,
            ctx,
            appointments: Vec::new(),
            range_version: 0,
            max_duration_minutes,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointment(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == Some(id))
    }

    pub fn view_context(&self) -> &ViewContext {
        &self.ctx
    }

    pub fn session(&self) -> &SessionUser {
        &self.session
    }

    /// The calendar-day window the collection is currently scoped to.
    pub fn active_range(&self) -> DateRange {
        resolve_context_range(&self.ctx)
    }

    /// Replace the collection with a fresh snapshot of the active range.
    pub fn refresh(&mut self) -> Result<(), SchedulerError> {
        self.range_version += 1;
        let range = self.active_range();

        let fetched = self
            .api
            .list(range, self.ctx.doctor_filter.doctor_id())?;

        log::info!(
            "refreshed {} appointments for {} .. {}",
            fetched.len(),
            range.start,
            range.end
        );
        self.appointments = fetched;
        Ok(())
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) -> Result<(), SchedulerError> {
        if self.ctx.view_mode == view_mode {
            return Ok(());
        }
        self.ctx.view_mode = view_mode;
        self.refresh()
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) -> Result<(), SchedulerError> {
        if self.ctx.anchor == anchor {
            return Ok(());
        }
        self.ctx.go_to(anchor);
        self.refresh()
    }

    pub fn set_explicit_range(
        &mut self,
        explicit: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<(), SchedulerError> {
        if self.ctx.explicit_range == explicit {
            return Ok(());
        }
        self.ctx.explicit_range = explicit;
        self.refresh()
    }

    /// Re-point the doctor filter. A doctor-role session is pinned to
    /// itself and may not widen or redirect the filter.
    pub fn set_doctor_filter(&mut self, filter: DoctorFilter) -> Result<(), SchedulerError> {
        if !self.session.role.can_choose_doctor()
            && filter != DoctorFilter::Doctor(self.session.user_id)
        {
            return Err(SchedulerError::Validation(
                "a doctor session can only view its own appointments".to_string(),
            ));
        }

        if self.ctx.doctor_filter == filter {
            return Ok(());
        }
        self.ctx.doctor_filter = filter;
        self.refresh()
    }

    pub fn go_to_today(&mut self, today: NaiveDate) -> Result<(), SchedulerError> {
        self.set_anchor(today)
    }

    pub fn step_forward(&mut self) -> Result<(), SchedulerError> {
        self.ctx.step_forward();
        self.refresh()
    }

    pub fn step_backward(&mut self) -> Result<(), SchedulerError> {
        self.ctx.step_backward();
        self.refresh()
    }

    fn ensure_editable_view(&self) -> Result<(), SchedulerError> {
        if !self.ctx.view_mode.allows_editing() {
            return Err(SchedulerError::Validation(
                "month view is read-only".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_known(&self, id: i64) -> Result<(), SchedulerError> {
        if self.appointment(id).is_none() {
            return Err(SchedulerError::Validation(format!(
                "appointment {} is not in the current view",
                id
            )));
        }
        Ok(())
    }

    /// Apply an optimistic commit only when the range version captured
    /// before the request is still current; a newer snapshot supersedes
    /// any older in-flight mutation's result.
    fn commit_if_current(&mut self, version: u64, commit: impl FnOnce(&mut Vec<Appointment>)) {
        if self.range_version == version {
            commit(&mut self.appointments);
        } else {
            log::info!(
                "discarding mutation result from superseded range version {}",
                version
            );
        }
    }

    /// Roll back an optimistic edit by re-fetching the active range. The
    /// original failure stays the surfaced error; a failed repair is
    /// logged on top of it.
    fn resynchronize_after(&mut self, what: &str, id: i64, err: &ApiError) {
        log::warn!("{} of appointment {} failed, resynchronizing: {}", what, id, err);
        if let Err(refresh_err) = self.refresh() {
            log::error!("resynchronization after failed {} also failed: {}", what, refresh_err);
        }
    }
}
