// libs/invoice-cell/src/services/billing.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Invoice, InvoiceError, InvoiceStatus, NewInvoice, UpdateInvoiceRequest};
use crate::store::InvoiceStore;

/// Lookup the billing service needs from the appointment ledger for
/// doctor-scoped queries. Implemented over the appointment store so this
/// cell never embeds appointment rows.
#[async_trait]
pub trait AppointmentResolver: Send + Sync {
    async fn appointment_ids_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Uuid>>;
}

pub struct BillingService {
    store: Arc<dyn InvoiceStore>,
    appointments: Arc<dyn AppointmentResolver>,
}

impl BillingService {
    pub fn new(store: Arc<dyn InvoiceStore>, appointments: Arc<dyn AppointmentResolver>) -> Self {
        Self { store, appointments }
    }

    /// Derives an invoice for a freshly booked appointment. The scheduling
    /// engine is the only caller; at most one invoice exists per appointment.
    pub async fn create_for_appointment(&self, new: NewInvoice) -> Result<Invoice, InvoiceError> {
        if new.amount <= Decimal::ZERO {
            return Err(InvoiceError::InvalidAmount);
        }

        let invoice = Invoice {
            id: Uuid::new_v4(),
            appointment_id: new.appointment_id,
            amount: new.amount,
            description: new.description,
            created_at: Utc::now(),
            status: InvoiceStatus::Pending,
        };

        let inserted = self
            .store
            .insert_unique(invoice)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?
            .ok_or(InvoiceError::AlreadyInvoiced(new.appointment_id))?;

        info!(
            "Invoice {} created for appointment {} ({})",
            inserted.id, inserted.appointment_id, inserted.amount
        );
        Ok(inserted)
    }

    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
        self.store
            .list()
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
        self.store
            .find(id)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?
            .ok_or(InvoiceError::NotFound)
    }

    pub async fn get_invoice_by_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Invoice, InvoiceError> {
        self.store
            .find_by_appointment(appointment_id)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?
            .ok_or(InvoiceError::NotFound)
    }

    pub async fn list_invoices_by_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Invoice>, InvoiceError> {
        let appointment_ids = self.doctor_appointment_ids(doctor_id).await?;
        let mut invoices = self.list_invoices().await?;
        invoices.retain(|invoice| appointment_ids.contains(&invoice.appointment_id));
        Ok(invoices)
    }

    pub async fn list_invoices_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, InvoiceError> {
        self.store
            .list_by_created_range(start, end)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))
    }

    pub async fn list_doctor_invoices_by_date_range(
        &self,
        doctor_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, InvoiceError> {
        let appointment_ids = self.doctor_appointment_ids(doctor_id).await?;
        let mut invoices = self.list_invoices_by_date_range(start, end).await?;
        invoices.retain(|invoice| appointment_ids.contains(&invoice.appointment_id));
        Ok(invoices)
    }

    pub async fn update_invoice(
        &self,
        id: Uuid,
        request: UpdateInvoiceRequest,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = self.get_invoice(id).await?;

        if let Some(amount) = request.amount {
            if amount <= Decimal::ZERO {
                return Err(InvoiceError::InvalidAmount);
            }
            invoice.amount = amount;
        }
        if let Some(description) = request.description {
            invoice.description = description;
        }
        if let Some(status) = request.status {
            invoice.status = status;
        }

        self.save(invoice).await
    }

    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), InvoiceError> {
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?;

        if !deleted {
            return Err(InvoiceError::NotFound);
        }
        info!("Invoice {} deleted", id);
        Ok(())
    }

    /// Idempotent: marking an already paid invoice paid again is a no-op.
    pub async fn mark_paid(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
        self.set_status(id, InvoiceStatus::Paid).await
    }

    /// Idempotent, same as `mark_paid`.
    pub async fn mark_cancelled(&self, id: Uuid) -> Result<Invoice, InvoiceError> {
        self.set_status(id, InvoiceStatus::Cancelled).await
    }

    /// Sum of all PAID invoice amounts. Missing data counts as zero.
    pub async fn total_revenue(&self) -> Result<Decimal, InvoiceError> {
        let invoices = self.list_invoices().await?;
        Ok(Self::paid_sum(&invoices))
    }

    pub async fn doctor_revenue(&self, doctor_id: Uuid) -> Result<Decimal, InvoiceError> {
        let invoices = self.list_invoices_by_doctor(doctor_id).await?;
        Ok(Self::paid_sum(&invoices))
    }

    async fn set_status(&self, id: Uuid, status: InvoiceStatus) -> Result<Invoice, InvoiceError> {
        let mut invoice = self.get_invoice(id).await?;
        if invoice.status == status {
            debug!("Invoice {} already {}", id, status);
            return Ok(invoice);
        }

        invoice.status = status;
        self.save(invoice).await
    }

    async fn save(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
        self.store
            .update(invoice)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?
            .ok_or(InvoiceError::NotFound)
    }

    async fn doctor_appointment_ids(&self, doctor_id: Uuid) -> Result<HashSet<Uuid>, InvoiceError> {
        let ids = self
            .appointments
            .appointment_ids_for_doctor(doctor_id)
            .await
            .map_err(|e| InvoiceError::DatabaseError(e.to_string()))?;
        Ok(ids.into_iter().collect())
    }

    fn paid_sum(invoices: &[Invoice]) -> Decimal {
        invoices
            .iter()
            .filter(|invoice| invoice.status == InvoiceStatus::Paid)
            .map(|invoice| invoice.amount)
            .sum()
    }
}
