pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{Doctor, DoctorError, WorkingHours};
pub use services::directory::DoctorDirectoryService;
pub use store::{DoctorStore, InMemoryDoctorStore};
