use std::sync::Arc;

use anyhow::Result;
use assert_matches::assert_matches;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use tokio::sync::RwLock;
use uuid::Uuid;

use invoice_cell::models::{InvoiceError, InvoiceStatus, NewInvoice, UpdateInvoiceRequest};
use invoice_cell::services::billing::{AppointmentResolver, BillingService};
use invoice_cell::store::InMemoryInvoiceStore;

/// Maps a doctor id to a fixed set of appointment ids, standing in for the
/// appointment ledger.
#[derive(Default)]
struct FixedResolver {
    by_doctor: RwLock<Vec<(Uuid, Uuid)>>,
}

impl FixedResolver {
    async fn link(&self, doctor_id: Uuid, appointment_id: Uuid) {
        self.by_doctor.write().await.push((doctor_id, appointment_id));
    }
}

#[async_trait]
impl AppointmentResolver for FixedResolver {
    async fn appointment_ids_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .by_doctor
            .read()
            .await
            .iter()
            .filter(|(doctor, _)| *doctor == doctor_id)
            .map(|(_, appointment)| *appointment)
            .collect())
    }
}

fn service_with_resolver() -> (BillingService, Arc<FixedResolver>) {
    let resolver = Arc::new(FixedResolver::default());
    let service = BillingService::new(Arc::new(InMemoryInvoiceStore::new()), resolver.clone());
    (service, resolver)
}

fn orthodontics_invoice(appointment_id: Uuid) -> NewInvoice {
    NewInvoice {
        appointment_id,
        amount: dec!(800.00),
        description: "Orthodontics visit - Ayse Kaya".to_string(),
    }
}

#[tokio::test]
async fn derived_invoice_starts_pending_with_doctor_fee() {
    let (service, _) = service_with_resolver();
    let appointment_id = Uuid::new_v4();

    let invoice = service
        .create_for_appointment(orthodontics_invoice(appointment_id))
        .await
        .unwrap();

    assert_eq!(invoice.appointment_id, appointment_id);
    assert_eq!(invoice.amount, dec!(800.00));
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert!(invoice.description.contains("Orthodontics"));
}

#[tokio::test]
async fn one_invoice_per_appointment() {
    let (service, _) = service_with_resolver();
    let appointment_id = Uuid::new_v4();

    service
        .create_for_appointment(orthodontics_invoice(appointment_id))
        .await
        .unwrap();
    assert_matches!(
        service
            .create_for_appointment(orthodontics_invoice(appointment_id))
            .await,
        Err(InvoiceError::AlreadyInvoiced(id)) if id == appointment_id
    );
}

#[tokio::test]
async fn zero_amount_is_rejected() {
    let (service, _) = service_with_resolver();

    let mut new = orthodontics_invoice(Uuid::new_v4());
    new.amount = dec!(0);
    assert_matches!(
        service.create_for_appointment(new).await,
        Err(InvoiceError::InvalidAmount)
    );
}

#[tokio::test]
async fn mark_paid_is_idempotent() {
    let (service, _) = service_with_resolver();
    let invoice = service
        .create_for_appointment(orthodontics_invoice(Uuid::new_v4()))
        .await
        .unwrap();

    let paid = service.mark_paid(invoice.id).await.unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    // Second call is a no-op success; amount and description untouched.
    let paid_again = service.mark_paid(invoice.id).await.unwrap();
    assert_eq!(paid_again.status, InvoiceStatus::Paid);
    assert_eq!(paid_again.amount, invoice.amount);
    assert_eq!(paid_again.description, invoice.description);
}

#[tokio::test]
async fn mark_paid_unknown_invoice_is_not_found() {
    let (service, _) = service_with_resolver();
    assert_matches!(
        service.mark_paid(Uuid::new_v4()).await,
        Err(InvoiceError::NotFound)
    );
}

#[tokio::test]
async fn revenue_counts_only_paid_invoices() {
    let (service, resolver) = service_with_resolver();
    let doctor_id = Uuid::new_v4();

    let first_appointment = Uuid::new_v4();
    let second_appointment = Uuid::new_v4();
    resolver.link(doctor_id, first_appointment).await;
    resolver.link(doctor_id, second_appointment).await;

    let first = service
        .create_for_appointment(orthodontics_invoice(first_appointment))
        .await
        .unwrap();
    let mut second_new = orthodontics_invoice(second_appointment);
    second_new.amount = dec!(1200.00);
    service.create_for_appointment(second_new).await.unwrap();

    service.mark_paid(first.id).await.unwrap();

    assert_eq!(service.total_revenue().await.unwrap(), dec!(800.00));
    assert_eq!(service.doctor_revenue(doctor_id).await.unwrap(), dec!(800.00));
    // A doctor with no appointments bills nothing.
    assert_eq!(
        service.doctor_revenue(Uuid::new_v4()).await.unwrap(),
        dec!(0)
    );
}

#[tokio::test]
async fn update_overwrites_amount_and_description() {
    let (service, _) = service_with_resolver();
    let invoice = service
        .create_for_appointment(orthodontics_invoice(Uuid::new_v4()))
        .await
        .unwrap();

    let updated = service
        .update_invoice(
            invoice.id,
            UpdateInvoiceRequest {
                amount: Some(dec!(950.00)),
                description: Some("Orthodontics visit with x-ray".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount, dec!(950.00));
    assert_eq!(updated.description, "Orthodontics visit with x-ray");
    assert_eq!(updated.status, InvoiceStatus::Pending);

    assert_matches!(
        service
            .update_invoice(
                invoice.id,
                UpdateInvoiceRequest {
                    amount: Some(dec!(-1)),
                    description: None,
                    status: None,
                }
            )
            .await,
        Err(InvoiceError::InvalidAmount)
    );
}

#[tokio::test]
async fn lookup_by_appointment() {
    let (service, _) = service_with_resolver();
    let appointment_id = Uuid::new_v4();
    let invoice = service
        .create_for_appointment(orthodontics_invoice(appointment_id))
        .await
        .unwrap();

    let found = service
        .get_invoice_by_appointment(appointment_id)
        .await
        .unwrap();
    assert_eq!(found.id, invoice.id);

    assert_matches!(
        service.get_invoice_by_appointment(Uuid::new_v4()).await,
        Err(InvoiceError::NotFound)
    );
}
