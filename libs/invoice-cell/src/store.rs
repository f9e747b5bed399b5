// libs/invoice-cell/src/store.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Invoice;

/// Persistence seam for the invoice ledger.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Inserts the invoice unless the appointment is already invoiced;
    /// check and write happen under one lock to keep the one-to-one
    /// appointment/invoice mapping.
    async fn insert_unique(&self, invoice: Invoice) -> Result<Option<Invoice>>;
    async fn find(&self, id: Uuid) -> Result<Option<Invoice>>;
    async fn find_by_appointment(&self, appointment_id: Uuid) -> Result<Option<Invoice>>;
    async fn list(&self) -> Result<Vec<Invoice>>;
    async fn list_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>>;
    async fn update(&self, invoice: Invoice) -> Result<Option<Invoice>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Default)]
pub struct InMemoryInvoiceStore {
    inner: RwLock<HashMap<Uuid, Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert_unique(&self, invoice: Invoice) -> Result<Option<Invoice>> {
        let mut inner = self.inner.write().await;
        if inner
            .values()
            .any(|existing| existing.appointment_id == invoice.appointment_id)
        {
            return Ok(None);
        }
        inner.insert(invoice.id, invoice.clone());
        Ok(Some(invoice))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Invoice>> {
        let inner = self.inner.read().await;
        Ok(inner.get(&id).cloned())
    }

    async fn find_by_appointment(&self, appointment_id: Uuid) -> Result<Option<Invoice>> {
        let inner = self.inner.read().await;
        Ok(inner
            .values()
            .find(|invoice| invoice.appointment_id == appointment_id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let inner = self.inner.read().await;
        let mut invoices: Vec<Invoice> = inner.values().cloned().collect();
        invoices.sort_by_key(|invoice| invoice.created_at);
        Ok(invoices)
    }

    async fn list_by_created_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>> {
        let mut invoices = self.list().await?;
        invoices.retain(|invoice| invoice.created_at >= start && invoice.created_at <= end);
        Ok(invoices)
    }

    async fn update(&self, invoice: Invoice) -> Result<Option<Invoice>> {
        let mut inner = self.inner.write().await;
        if !inner.contains_key(&invoice.id) {
            return Ok(None);
        }
        inner.insert(invoice.id, invoice.clone());
        Ok(Some(invoice))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.remove(&id).is_some())
    }
}
