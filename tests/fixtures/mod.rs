// Scripted in-memory appointment store shared by the integration tests.
//
// The real store normalizes the clinic wire-clock offset before echoing
// reads, so successful writes here convert the wire timestamp back to the
// grid-local representation.

use std::cell::RefCell;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

use clinic_scheduler::models::appointment::Appointment;
use clinic_scheduler::models::directory::{Doctor, Patient, Role, SessionUser};
use clinic_scheduler::services::grid::CLINIC_UTC_OFFSET_HOURS;
use clinic_scheduler::services::range::DateRange;
use clinic_scheduler::services::repository::{
    ApiError, AppointmentApi, CreateAppointment, DirectoryApi,
};

#[derive(Default)]
pub struct FakeStore {
    pub records: RefCell<Vec<Appointment>>,
    pub calls: RefCell<Vec<&'static str>>,
    pub last_list_range: RefCell<Option<DateRange>>,
    pub last_list_doctor: RefCell<Option<Option<i64>>>,
    pub fail_next_update: RefCell<Option<ApiError>>,
    pub fail_next_create: RefCell<Option<ApiError>>,
    pub fail_next_delete: RefCell<Option<ApiError>>,
    pub fail_next_notes: RefCell<Option<ApiError>>,
    pub next_id: RefCell<i64>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            next_id: RefCell::new(100),
            ..Default::default()
        }
    }

    pub fn seed(&self, appointment: Appointment) {
        self.records.borrow_mut().push(appointment);
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == name).count()
    }

    fn from_wire(wire: DateTime<Utc>) -> DateTime<Local> {
        (wire - Duration::hours(CLINIC_UTC_OFFSET_HOURS)).with_timezone(&Local)
    }
}

impl AppointmentApi for &FakeStore {
    fn list(&self, range: DateRange, doctor_id: Option<i64>) -> Result<Vec<Appointment>, ApiError> {
        self.calls.borrow_mut().push("list");
        *self.last_list_range.borrow_mut() = Some(range);
        *self.last_list_doctor.borrow_mut() = Some(doctor_id);

        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|a| range.contains(a.start.date_naive()))
            .filter(|a| doctor_id.is_none() || a.doctor_id == doctor_id)
            .cloned()
            .collect())
    }

    fn create(&self, request: &CreateAppointment) -> Result<i64, ApiError> {
        self.calls.borrow_mut().push("create");
        if let Some(err) = self.fail_next_create.borrow_mut().take() {
            return Err(err);
        }

        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let id = *next;

        self.records.borrow_mut().push(Appointment {
            id: Some(id),
            patient_id: Some(request.patient_id),
            doctor_id: Some(request.doctor_id),
            start: FakeStore::from_wire(request.wire_start),
            duration_minutes: request.duration_minutes,
            notes: Some(request.notes.clone()).filter(|n| !n.is_empty()),
            doctor_first_name: None,
            doctor_last_name: None,
        });
        Ok(id)
    }

    fn update_time_and_duration(
        &self,
        id: i64,
        wire_start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<(), ApiError> {
        self.calls.borrow_mut().push("update_time_duration");
        if let Some(err) = self.fail_next_update.borrow_mut().take() {
            return Err(err);
        }

        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|a| a.id == Some(id))
            .ok_or_else(|| ApiError::Application("appointment not found".to_string()))?;

        record.start = FakeStore::from_wire(wire_start);
        record.duration_minutes = duration_minutes;
        Ok(())
    }

    fn update_notes(&self, id: i64, notes: &str) -> Result<(), ApiError> {
        self.calls.borrow_mut().push("update_notes");
        if let Some(err) = self.fail_next_notes.borrow_mut().take() {
            return Err(err);
        }

        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|a| a.id == Some(id))
            .ok_or_else(|| ApiError::Application("appointment not found".to_string()))?;

        record.notes = Some(notes.to_string()).filter(|n| !n.is_empty());
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.calls.borrow_mut().push("delete");
        if let Some(err) = self.fail_next_delete.borrow_mut().take() {
            return Err(err);
        }

        let mut records = self.records.borrow_mut();
        let before = records.len();
        records.retain(|a| a.id != Some(id));
        if records.len() == before {
            return Err(ApiError::Application("appointment not found".to_string()));
        }
        Ok(())
    }
}

impl DirectoryApi for &FakeStore {
    fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        Ok(vec![
            Doctor {
                user_id: 3,
                first_name: "Ayse".to_string(),
                last_name: "Kaya".to_string(),
                username: None,
            },
            Doctor {
                user_id: 4,
                first_name: "Mert".to_string(),
                last_name: "Aydin".to_string(),
                username: None,
            },
        ])
    }

    fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        Ok(vec![Patient {
            patient_id: 12,
            first_name: "Elif".to_string(),
            last_name: "Demir".to_string(),
            phone: Some("0532 111 22 33".to_string()),
            email: None,
        }])
    }
}

pub fn admin_session() -> SessionUser {
    SessionUser {
        user_id: 1,
        role: Role::Admin,
        first_name: "Front".to_string(),
        last_name: "Desk".to_string(),
    }
}

pub fn doctor_session(user_id: i64) -> SessionUser {
    SessionUser {
        user_id,
        role: Role::Doctor,
        first_name: "Ayse".to_string(),
        last_name: "Kaya".to_string(),
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn booked(id: i64, doctor_id: i64, start: DateTime<Local>, minutes: i64) -> Appointment {
    Appointment {
        id: Some(id),
        patient_id: Some(12),
        doctor_id: Some(doctor_id),
        start,
        duration_minutes: minutes,
        notes: None,
        doctor_first_name: Some("Ayse".to_string()),
        doctor_last_name: Some("Kaya".to_string()),
    }
}
