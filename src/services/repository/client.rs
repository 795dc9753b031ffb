use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;

use crate::models::appointment::Appointment;
use crate::models::directory::{Doctor, Patient};
use crate::services::range::DateRange;

use super::wire::{
    format_wire_time, AppointmentRecord, CreateBody, CreatedRecord, Envelope, NotesBody,
    TimeDurationBody,
};
use super::{ApiError, AppointmentApi, CreateAppointment, DirectoryApi};

/// Blocking HTTP client for the appointment store.
///
/// Idempotent calls (list, the two PATCHes, directory reads) retry a
/// couple of times on transport errors; create and delete go out exactly
/// once.
pub struct HttpAppointmentClient {
    client: Client,
    base_url: String,
    max_retries: usize,
    retry_delay_ms: u64,
}

impl HttpAppointmentClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: 2,
            retry_delay_ms: 400,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_retry<T>(
        &self,
        what: &str,
        mut attempt_once: impl FnMut() -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..=self.max_retries {
            match attempt_once() {
                Ok(value) => return Ok(value),
                // server answers are authoritative, only transport errors retry
                Err(err @ ApiError::Application(_)) => return Err(err),
                Err(err) => {
                    if attempt < self.max_retries {
                        log::warn!("{} attempt {} failed: {}", what, attempt + 1, err);
                        thread::sleep(Duration::from_millis(self.retry_delay_ms));
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::Transport("unknown request error".to_string())))
    }

    /// Unwrap the `{ success, data, message }` envelope, treating an error
    /// status or `success: false` as an application failure.
    fn parse_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .ok()
                .and_then(|envelope| envelope.message)
                .unwrap_or_else(|| format!("HTTP status {}", status));
            return Err(ApiError::Application(message));
        }

        let envelope: Envelope<T> = response.json()?;
        if !envelope.success {
            return Err(ApiError::Application(
                envelope
                    .message
                    .unwrap_or_else(|| "server reported failure".to_string()),
            ));
        }

        Ok(envelope)
    }

    fn expect_data<T>(envelope: Envelope<T>, what: &str) -> Result<T, ApiError> {
        envelope
            .data
            .ok_or_else(|| ApiError::Transport(format!("{} response carried no data", what)))
    }
}

impl AppointmentApi for HttpAppointmentClient {
    fn list(&self, range: DateRange, doctor_id: Option<i64>) -> Result<Vec<Appointment>, ApiError> {
        self.with_retry("appointment list", || {
            let mut request = self.client.get(self.url("/appointment")).query(&[
                ("start_date", range.start.format("%Y-%m-%d").to_string()),
                ("end_date", range.end.format("%Y-%m-%d").to_string()),
            ]);
            if let Some(doctor_id) = doctor_id {
                request = request.query(&[("doctor_id", doctor_id.to_string())]);
            }

            let envelope: Envelope<Vec<AppointmentRecord>> =
                Self::parse_envelope(request.send()?)?;
            let records = Self::expect_data(envelope, "appointment list")?;

            records
                .into_iter()
                .map(|record| {
                    record.into_appointment().map_err(|err| {
                        ApiError::Transport(format!("malformed appointment record: {}", err))
                    })
                })
                .collect()
        })
    }

    fn create(&self, request: &CreateAppointment) -> Result<i64, ApiError> {
        let body = CreateBody {
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            appointment_time: format_wire_time(request.wire_start),
            duration: request.duration_minutes,
            notes: &request.notes,
        };

        let response = self
            .client
            .post(self.url("/appointment"))
            .json(&body)
            .send()?;
        let envelope: Envelope<CreatedRecord> = Self::parse_envelope(response)?;
        Ok(Self::expect_data(envelope, "appointment create")?.appointment_id)
    }

    fn update_time_and_duration(
        &self,
        id: i64,
        wire_start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<(), ApiError> {
        let body = TimeDurationBody {
            appointment_time: format_wire_time(wire_start),
            duration: duration_minutes,
        };

        self.with_retry("time-duration update", || {
            let response = self
                .client
                .patch(self.url(&format!("/appointment/{}/time-duration", id)))
                .json(&body)
                .send()?;
            Self::parse_envelope::<serde_json::Value>(response)?;
            Ok(())
        })
    }

    fn update_notes(&self, id: i64, notes: &str) -> Result<(), ApiError> {
        self.with_retry("notes update", || {
            let response = self
                .client
                .patch(self.url(&format!("/appointment/{}/notes", id)))
                .json(&NotesBody { notes })
                .send()?;
            Self::parse_envelope::<serde_json::Value>(response)?;
            Ok(())
        })
    }

    fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/appointment/{}", id)))
            .send()?;
        Self::parse_envelope::<serde_json::Value>(response)?;
        Ok(())
    }
}

impl DirectoryApi for HttpAppointmentClient {
    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.with_retry("doctor list", || {
            let response = self.client.get(self.url("/user/doctors")).send()?;
            let envelope: Envelope<Vec<Doctor>> = Self::parse_envelope(response)?;
            Self::expect_data(envelope, "doctor list")
        })
    }

    fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.with_retry("patient list", || {
            let response = self.client.get(self.url("/patient")).send()?;
            let envelope: Envelope<Vec<Patient>> = Self::parse_envelope(response)?;
            Self::expect_data(envelope, "patient list")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client =
            HttpAppointmentClient::new("http://localhost:3001/api/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            client.url("/appointment/7/notes"),
            "http://localhost:3001/api/appointment/7/notes"
        );
    }

    #[test]
    fn test_retry_gives_up_after_application_error() {
        let client =
            HttpAppointmentClient::new("http://localhost:3001/api", Duration::from_secs(5))
                .unwrap();

        let mut attempts = 0;
        let result: Result<(), ApiError> = client.with_retry("probe", || {
            attempts += 1;
            Err(ApiError::Application("nope".to_string()))
        });

        assert_eq!(result, Err(ApiError::Application("nope".to_string())));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_retry_repeats_transport_errors() {
        let client =
            HttpAppointmentClient::new("http://localhost:3001/api", Duration::from_secs(5))
                .unwrap();

        let mut attempts = 0;
        let result: Result<(), ApiError> = client.with_retry("probe", || {
            attempts += 1;
            Err(ApiError::Transport("connection refused".to_string()))
        });

        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert_eq!(attempts, 3);
    }
}
