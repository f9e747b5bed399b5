// libs/invoice-cell/src/models.rs
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::AppError;

// ==============================================================================
// CORE INVOICE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    /// One-to-one reference to the appointment this invoice bills.
    pub appointment_id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Invoice derivation input. Only the scheduling engine builds these;
/// invoices are never created directly by a caller.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub appointment_id: Uuid,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub status: Option<InvoiceStatus>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum InvoiceError {
    #[error("Invoice not found")]
    NotFound,

    #[error("Invoice already exists for appointment {0}")]
    AlreadyInvoiced(Uuid),

    #[error("Invoice amount must be greater than zero")]
    InvalidAmount,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound => AppError::NotFound("Invoice not found".to_string()),
            InvoiceError::AlreadyInvoiced(_) => AppError::Conflict(err.to_string()),
            InvoiceError::InvalidAmount => AppError::BadRequest(err.to_string()),
            InvoiceError::DatabaseError(msg) => AppError::Internal(msg),
        }
    }
}
