// libs/invoice-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::UpdateInvoiceRequest;
use crate::services::billing::BillingService;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[axum::debug_handler]
pub async fn list_invoices(
    State(service): State<Arc<BillingService>>,
) -> Result<Json<Value>, AppError> {
    let invoices = service.list_invoices().await?;
    Ok(Json(json!({
        "invoices": invoices,
        "total": invoices.len()
    })))
}

#[axum::debug_handler]
pub async fn get_invoice(
    State(service): State<Arc<BillingService>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invoice = service.get_invoice(invoice_id).await?;
    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn get_invoice_by_appointment(
    State(service): State<Arc<BillingService>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invoice = service.get_invoice_by_appointment(appointment_id).await?;
    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn list_doctor_invoices(
    State(service): State<Arc<BillingService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invoices = service.list_invoices_by_doctor(doctor_id).await?;
    Ok(Json(json!(invoices)))
}

#[axum::debug_handler]
pub async fn list_invoices_by_date_range(
    State(service): State<Arc<BillingService>>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let invoices = service.list_invoices_by_date_range(range.start, range.end).await?;
    Ok(Json(json!(invoices)))
}

#[axum::debug_handler]
pub async fn list_doctor_invoices_by_date_range(
    State(service): State<Arc<BillingService>>,
    Path(doctor_id): Path<Uuid>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Value>, AppError> {
    let invoices = service
        .list_doctor_invoices_by_date_range(doctor_id, range.start, range.end)
        .await?;
    Ok(Json(json!(invoices)))
}

#[axum::debug_handler]
pub async fn total_revenue(
    State(service): State<Arc<BillingService>>,
) -> Result<Json<Value>, AppError> {
    let revenue = service.total_revenue().await?;
    Ok(Json(json!({ "revenue": revenue })))
}

#[axum::debug_handler]
pub async fn doctor_revenue(
    State(service): State<Arc<BillingService>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let revenue = service.doctor_revenue(doctor_id).await?;
    Ok(Json(json!({ "doctor_id": doctor_id, "revenue": revenue })))
}

#[axum::debug_handler]
pub async fn update_invoice(
    State(service): State<Arc<BillingService>>,
    Path(invoice_id): Path<Uuid>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<Value>, AppError> {
    let invoice = service.update_invoice(invoice_id, request).await?;
    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn mark_paid(
    State(service): State<Arc<BillingService>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invoice = service.mark_paid(invoice_id).await?;
    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn mark_cancelled(
    State(service): State<Arc<BillingService>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let invoice = service.mark_cancelled(invoice_id).await?;
    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn delete_invoice(
    State(service): State<Arc<BillingService>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete_invoice(invoice_id).await?;
    Ok(Json(json!({ "deleted": invoice_id })))
}
