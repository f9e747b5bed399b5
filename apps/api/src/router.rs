use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::notifications::LogNotifier;
use appointment_cell::services::scheduling::SchedulingService;
use appointment_cell::store::{AppointmentStore, InMemoryAppointmentStore, StoreAppointmentResolver};
use doctor_cell::router::doctor_routes;
use doctor_cell::services::directory::DoctorDirectoryService;
use doctor_cell::store::InMemoryDoctorStore;
use invoice_cell::router::invoice_routes;
use invoice_cell::services::billing::BillingService;
use invoice_cell::store::InMemoryInvoiceStore;

/// Wired service graph shared by every route tree. The doctor and
/// appointment stores are shared: the scheduling engine reads the doctor
/// directory, and the billing service resolves doctor-scoped queries
/// through the appointment ledger.
pub struct Cells {
    pub doctor_directory: Arc<DoctorDirectoryService>,
    pub scheduling: Arc<SchedulingService>,
    pub billing: Arc<BillingService>,
}

impl Cells {
    pub fn new() -> Self {
        let doctor_store = Arc::new(InMemoryDoctorStore::new());
        let appointment_store: Arc<dyn AppointmentStore> =
            Arc::new(InMemoryAppointmentStore::new());
        let invoice_store = Arc::new(InMemoryInvoiceStore::new());

        let billing = Arc::new(BillingService::new(
            invoice_store,
            Arc::new(StoreAppointmentResolver::new(appointment_store.clone())),
        ));
        let doctor_directory = Arc::new(DoctorDirectoryService::new(doctor_store.clone()));
        let scheduling = Arc::new(SchedulingService::new(
            doctor_store,
            appointment_store,
            billing.clone(),
            Arc::new(LogNotifier),
        ));

        Self {
            doctor_directory,
            scheduling,
            billing,
        }
    }
}

impl Default for Cells {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_router(cells: &Cells) -> Router {
    Router::new()
        .route("/", get(|| async { "Klinik API is running!" }))
        .nest("/doctors", doctor_routes(cells.doctor_directory.clone()))
        .nest("/appointments", appointment_routes(cells.scheduling.clone()))
        .nest("/invoices", invoice_routes(cells.billing.clone()))
}
