// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, UpdateAppointmentRequest};
use crate::services::scheduling::SchedulingService;

#[derive(Debug, Deserialize)]
pub struct PatientQuery {
    pub national_id: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ==============================================================================
// PUBLIC HANDLERS (PATIENT SELF-SERVICE)
// ==============================================================================

#[axum::debug_handler]
pub async fn create_appointment_public(
    State(service): State<Arc<SchedulingService>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let appointment = service.create_appointment(request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = service
        .get_appointments_by_patient(&query.national_id, &query.first_name, &query.last_name)
        .await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_available_time_slots(
    State(service): State<Arc<SchedulingService>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let slots = service
        .get_available_time_slots(query.doctor_id, query.date)
        .await?;
    Ok(Json(json!({
        "doctor_id": query.doctor_id,
        "date": query.date,
        "available_slots": slots,
    })))
}

// ==============================================================================
// STAFF HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(service): State<Arc<SchedulingService>>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.list_appointments().await?;
    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(service): State<Arc<SchedulingService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = service.get_appointment(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(service): State<Arc<SchedulingService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointments = service.get_appointments_by_doctor(doctor_id).await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments_by_date_range(
    State(service): State<Arc<SchedulingService>>,
    Path(doctor_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = service
        .get_doctor_appointments_by_date_range(doctor_id, range.start, range.end)
        .await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointments_by_date_range(
    State(service): State<Arc<SchedulingService>>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = service
        .get_appointments_by_date_range(range.start, range.end)
        .await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(service): State<Arc<SchedulingService>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let appointment = service.update_appointment(appointment_id, request).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(service): State<Arc<SchedulingService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete_appointment(appointment_id).await?;
    Ok(Json(json!({ "deleted": appointment_id })))
}
