// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::scheduling::SchedulingService;

pub fn appointment_routes(service: Arc<SchedulingService>) -> Router {
    // Self-service booking and slot queries need no role; everything else
    // is staff-only, gated at the deployment boundary.
    let public_routes = Router::new()
        .route("/public", post(handlers::create_appointment_public))
        .route("/public/patient", get(handlers::get_patient_appointments))
        .route("/public/available-slots", get(handlers::get_available_time_slots));

    let staff_routes = Router::new()
        .route("/all", get(handlers::list_appointments))
        .route("/date-range", get(handlers::get_appointments_by_date_range))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_appointments))
        .route(
            "/doctor/{doctor_id}/date-range",
            get(handlers::get_doctor_appointments_by_date_range),
        )
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", put(handlers::update_appointment))
        .route("/{appointment_id}", delete(handlers::delete_appointment));

    Router::new()
        .merge(public_routes)
        .merge(staff_routes)
        .with_state(service)
}
