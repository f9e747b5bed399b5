pub mod availability;
pub mod notifications;
pub mod scheduling;
