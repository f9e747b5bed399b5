pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;

pub use models::{Invoice, InvoiceError, InvoiceStatus, NewInvoice};
pub use services::billing::{AppointmentResolver, BillingService};
pub use store::{InMemoryInvoiceStore, InvoiceStore};
