// libs/doctor-cell/src/models.rs
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use shared_models::AppError;

// ==============================================================================
// CORE DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub years_experience: i32,
    pub about: Option<String>,
    /// Daily open/close interval encoded as "HH:MM-HH:MM". `None` means the
    /// doctor takes appointments at any grid time.
    pub working_hours: Option<String>,
    pub consultation_fee: Decimal,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Parsed working hours. Legacy rows may hold strings that no longer
    /// parse; those read as `None` so scheduling stays fail-open.
    pub fn parsed_working_hours(&self) -> Option<WorkingHours> {
        self.working_hours
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }
}

/// A doctor's daily open/close interval. Both boundaries are bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WorkingHours {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

impl FromStr for WorkingHours {
    type Err = DoctorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || DoctorError::InvalidWorkingHours(raw.to_string());

        let (start_raw, end_raw) = raw.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start_raw.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end_raw.trim(), "%H:%M").map_err(|_| invalid())?;

        Ok(Self { start, end })
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub years_experience: i32,
    pub about: Option<String>,
    pub working_hours: Option<String>,
    pub consultation_fee: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialty: Option<String>,
    pub years_experience: Option<i32>,
    pub about: Option<String>,
    pub working_hours: Option<String>,
    pub consultation_fee: Option<Decimal>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Consultation fee must be greater than zero")]
    InvalidFee,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::InvalidWorkingHours(_) | DoctorError::InvalidFee => {
                AppError::BadRequest(err.to_string())
            }
            DoctorError::DatabaseError(msg) => AppError::Internal(msg),
        }
    }
}
