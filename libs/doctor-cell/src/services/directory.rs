// libs/doctor-cell/src/services/directory.rs
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{CreateDoctorRequest, Doctor, DoctorError, UpdateDoctorRequest, WorkingHours};
use crate::store::DoctorStore;

/// Read-mostly directory of doctor records. Working-hours strings are
/// validated here at the write boundary; reads of legacy rows stay fail-open.
pub struct DoctorDirectoryService {
    store: Arc<dyn DoctorStore>,
}

impl DoctorDirectoryService {
    pub fn new(store: Arc<dyn DoctorStore>) -> Self {
        Self { store }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        self.store
            .list()
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        self.store
            .find(doctor_id)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn list_doctors_by_specialty(
        &self,
        specialty: &str,
    ) -> Result<Vec<Doctor>, DoctorError> {
        let mut doctors = self.list_doctors().await?;
        doctors.retain(|d| d.specialty.eq_ignore_ascii_case(specialty));
        Ok(doctors)
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        Self::validate_fee(request.consultation_fee)?;
        Self::validate_working_hours(request.working_hours.as_deref())?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            first_name: request.first_name,
            last_name: request.last_name,
            specialty: request.specialty,
            years_experience: request.years_experience,
            about: request.about,
            working_hours: request.working_hours,
            consultation_fee: request.consultation_fee,
        };

        let doctor = self
            .store
            .insert(doctor)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        info!("Doctor {} created ({})", doctor.id, doctor.specialty);
        Ok(doctor)
    }

    pub async fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        let mut doctor = self.get_doctor(doctor_id).await?;

        if let Some(fee) = request.consultation_fee {
            Self::validate_fee(fee)?;
            doctor.consultation_fee = fee;
        }
        if let Some(working_hours) = request.working_hours {
            Self::validate_working_hours(Some(&working_hours))?;
            doctor.working_hours = Some(working_hours);
        }
        if let Some(first_name) = request.first_name {
            doctor.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            doctor.last_name = last_name;
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = specialty;
        }
        if let Some(years_experience) = request.years_experience {
            doctor.years_experience = years_experience;
        }
        if let Some(about) = request.about {
            doctor.about = Some(about);
        }

        self.store
            .update(doctor)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        let deleted = self
            .store
            .delete(doctor_id)
            .await
            .map_err(|e| DoctorError::DatabaseError(e.to_string()))?;

        if !deleted {
            return Err(DoctorError::NotFound);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }

    pub async fn has_doctors(&self) -> Result<bool, DoctorError> {
        Ok(!self.list_doctors().await?.is_empty())
    }

    fn validate_fee(fee: Decimal) -> Result<(), DoctorError> {
        if fee <= Decimal::ZERO {
            return Err(DoctorError::InvalidFee);
        }
        Ok(())
    }

    fn validate_working_hours(raw: Option<&str>) -> Result<(), DoctorError> {
        let Some(raw) = raw else {
            return Ok(());
        };

        let hours: WorkingHours = raw.parse()?;
        if hours.start >= hours.end {
            return Err(DoctorError::InvalidWorkingHours(raw.to_string()));
        }
        Ok(())
    }
}
