// libs/doctor-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::directory::DoctorDirectoryService;

pub fn doctor_routes(service: Arc<DoctorDirectoryService>) -> Router {
    // Listing and profile reads are public so patients can pick a doctor;
    // mutations are staff operations gated at the deployment boundary.
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/", post(handlers::create_doctor))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .route("/{doctor_id}", put(handlers::update_doctor))
        .route("/{doctor_id}", delete(handlers::delete_doctor))
        .with_state(service)
}
