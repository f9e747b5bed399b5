// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::directory::DoctorDirectoryService;

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub specialty: Option<String>,
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(service): State<Arc<DoctorDirectoryService>>,
    Query(query): Query<DoctorListQuery>,
) -> Result<Json<Value>, AppError> {
    let doctors = match query.specialty {
        Some(specialty) => service.list_doctors_by_specialty(&specialty).await?,
        None => service.list_doctors().await?,
    };

    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(service): State<Arc<DoctorDirectoryService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.get_doctor(doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(service): State<Arc<DoctorDirectoryService>>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.create_doctor(request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(service): State<Arc<DoctorDirectoryService>>,
    Path(doctor_id): Path<Uuid>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = service.update_doctor(doctor_id, request).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(service): State<Arc<DoctorDirectoryService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete_doctor(doctor_id).await?;
    Ok(Json(json!({ "deleted": doctor_id })))
}
