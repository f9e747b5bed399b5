// libs/invoice-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, put},
    Router,
};

use crate::handlers;
use crate::services::billing::BillingService;

/// Billing is staff-facing; the deployment boundary restricts these routes
/// to doctor or admin roles.
pub fn invoice_routes(service: Arc<BillingService>) -> Router {
    Router::new()
        .route("/all", get(handlers::list_invoices))
        .route("/date-range", get(handlers::list_invoices_by_date_range))
        .route("/revenue", get(handlers::total_revenue))
        .route("/appointment/{appointment_id}", get(handlers::get_invoice_by_appointment))
        .route("/doctor/{doctor_id}", get(handlers::list_doctor_invoices))
        .route("/doctor/{doctor_id}/revenue", get(handlers::doctor_revenue))
        .route(
            "/doctor/{doctor_id}/date-range",
            get(handlers::list_doctor_invoices_by_date_range),
        )
        .route("/{invoice_id}", get(handlers::get_invoice))
        .route("/{invoice_id}", put(handlers::update_invoice))
        .route("/{invoice_id}", delete(handlers::delete_invoice))
        .route("/{invoice_id}/pay", patch(handlers::mark_paid))
        .route("/{invoice_id}/cancel", patch(handlers::mark_cancelled))
        .with_state(service)
}
