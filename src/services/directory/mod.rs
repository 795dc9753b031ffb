//! Read-only lookup caches over the patient and doctor directories.
//!
//! Refreshed on mount and whenever the session changes; the scheduler only
//! reads from here, it never writes back.

use crate::models::directory::{Doctor, Patient};
use crate::services::repository::{ApiError, DirectoryApi};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryCache {
    patients: Vec<Patient>,
    doctors: Vec<Doctor>,
}

impl DirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload both directories from the remote store.
    pub fn refresh(&mut self, api: &impl DirectoryApi) -> Result<(), ApiError> {
        self.doctors = api.list_doctors()?;
        self.patients = api.list_patients()?;
        log::info!(
            "directory refreshed: {} doctors, {} patients",
            self.doctors.len(),
            self.patients.len()
        );
        Ok(())
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn patient(&self, patient_id: i64) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }

    pub fn doctor(&self, user_id: i64) -> Option<&Doctor> {
        self.doctors.iter().find(|d| d.user_id == user_id)
    }

    /// Patients matching a create-flow search string (name or phone).
    pub fn search_patients(&self, query: &str) -> Vec<&Patient> {
        self.patients.iter().filter(|p| p.matches(query)).collect()
    }

    /// Doctors matching a create-flow search string.
    pub fn search_doctors(&self, query: &str) -> Vec<&Doctor> {
        self.doctors.iter().filter(|d| d.matches(query)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDirectory;

    impl DirectoryApi for StubDirectory {
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
                    username: Some("maydin".to_string()),
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

    #[test]
    fn test_refresh_fills_both_caches() {
        let mut cache = DirectoryCache::new();
        cache.refresh(&StubDirectory).unwrap();

        assert_eq!(cache.doctors().len(), 2);
        assert_eq!(cache.patients().len(), 1);
        assert_eq!(cache.doctor(3).unwrap().last_name, "Kaya");
        assert_eq!(cache.patient(12).unwrap().first_name, "Elif");
        assert!(cache.doctor(99).is_none());
    }

    #[test]
    fn test_search_filters_by_substring() {
        let mut cache = DirectoryCache::new();
        cache.refresh(&StubDirectory).unwrap();

        assert_eq!(cache.search_doctors("ay").len(), 2);
        assert_eq!(cache.search_doctors("kaya").len(), 1);
        assert_eq!(cache.search_patients("0532").len(), 1);
        assert!(cache.search_patients("yok").is_empty());
    }
}
