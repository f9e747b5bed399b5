pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{Appointment, AppointmentStatus, BookAppointmentRequest, SchedulingError};
pub use services::scheduling::SchedulingService;
pub use store::{AppointmentStore, InMemoryAppointmentStore, StoreAppointmentResolver};
