// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_first_name: String,
    pub patient_last_name: String,
    /// Fixed 11-digit national identity number.
    pub national_id: String,
    /// 10 or 11 digit phone number.
    pub phone: String,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub department: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn patient_full_name(&self) -> String {
        format!("{} {}", self.patient_first_name, self.patient_last_name)
    }
}

/// Pending -> Confirmed -> Completed, with Cancelled reachable from Pending
/// or Confirmed. Status is never consulted by conflict detection; a
/// cancelled row still blocks its slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub national_id: String,
    pub phone: String,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub department: String,
}

impl BookAppointmentRequest {
    /// Boundary validation; the engine itself trusts its input.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        validate_patient_fields(&self.national_id, &self.phone)
    }
}

/// Full replacement of an appointment's mutable fields. The doctor
/// reference is deliberately absent; it never changes after booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub national_id: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub department: String,
    pub status: AppointmentStatus,
}

impl UpdateAppointmentRequest {
    pub fn validate(&self) -> Result<(), SchedulingError> {
        validate_patient_fields(&self.national_id, &self.phone)
    }
}

fn validate_patient_fields(national_id: &str, phone: &str) -> Result<(), SchedulingError> {
    if national_id.len() != 11 || !national_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchedulingError::InvalidPatientField(
            "national id must be exactly 11 digits".to_string(),
        ));
    }
    if !(10..=11).contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SchedulingError::InvalidPatientField(
            "phone must be 10 or 11 digits".to_string(),
        ));
    }
    Ok(())
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Slot already booked")]
    SlotTaken,

    #[error("Requested time is outside the doctor's working hours")]
    OutsideWorkingHours,

    #[error("Invalid patient field: {0}")]
    InvalidPatientField(String),

    /// The appointment was persisted but invoice derivation failed. The
    /// appointment stays queryable; the caller retries invoice creation.
    #[error("Appointment {appointment_id} saved but invoice creation failed")]
    InvoiceCreationFailed { appointment_id: Uuid },

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            SchedulingError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            SchedulingError::SlotTaken => AppError::Conflict("Slot already booked".to_string()),
            SchedulingError::OutsideWorkingHours | SchedulingError::InvalidPatientField(_) => {
                AppError::BadRequest(err.to_string())
            }
            SchedulingError::InvoiceCreationFailed { appointment_id } => {
                AppError::PartialFailure { appointment_id }
            }
            SchedulingError::DatabaseError(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_first_name: "Ahmet".to_string(),
            patient_last_name: "Yilmaz".to_string(),
            national_id: "12345678901".to_string(),
            phone: "5551234567".to_string(),
            doctor_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            department: "Orthodontics".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn national_id_must_be_eleven_digits() {
        let mut req = request();
        req.national_id = "1234567890".to_string();
        assert!(req.validate().is_err());

        req.national_id = "1234567890a".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn phone_must_be_ten_or_eleven_digits() {
        let mut req = request();
        req.phone = "555123".to_string();
        assert!(req.validate().is_err());

        req.phone = "05551234567".to_string();
        assert!(req.validate().is_ok());
    }
}
