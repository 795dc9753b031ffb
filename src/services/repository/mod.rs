//! Remote appointment store access.
//!
//! Wire records are duck-typed JSON; they are mapped into the strongly
//! typed [`Appointment`] entity at this boundary and never cross into the
//! scheduler raw. The scheduler talks to the store through the two traits
//! below so tests can script the remote side.

pub mod client;
pub mod wire;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::appointment::Appointment;
use crate::models::directory::{Doctor, Patient};
use crate::services::range::DateRange;

pub use client::HttpAppointmentClient;

/// How a remote call can fail. A response only counts as success when the
/// transport succeeded AND the body carries `success: true`; anything else
/// lands here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed: connect error, timeout, garbled body.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The server answered and refused: error status or `success: false`.
    #[error("request rejected: {0}")]
    Application(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Parameters for booking a new appointment.
///
/// `wire_start` is already on the wire clock; callers convert through
/// [`crate::services::grid::to_wire_time`] before building this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub wire_start: DateTime<Utc>,
    pub duration_minutes: i64,
    pub notes: String,
}

/// Appointment operations against the remote store.
///
/// `list`, `update_time_and_duration`, and `update_notes` are idempotent
/// and may be retried by implementations; `create` and `delete` must not
/// be retried automatically.
pub trait AppointmentApi {
    fn list(&self, range: DateRange, doctor_id: Option<i64>) -> Result<Vec<Appointment>, ApiError>;

    /// Book an appointment; returns the server-assigned id.
    fn create(&self, request: &CreateAppointment) -> Result<i64, ApiError>;

    fn update_time_and_duration(
        &self,
        id: i64,
        wire_start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<(), ApiError>;

    fn update_notes(&self, id: i64, notes: &str) -> Result<(), ApiError>;

    fn delete(&self, id: i64) -> Result<(), ApiError>;
}

/// Read-only directory listings.
pub trait DirectoryApi {
    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError>;
    fn list_patients(&self) -> Result<Vec<Patient>, ApiError>;
}
