// libs/appointment-cell/src/services/scheduling.rs
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::store::DoctorStore;
use invoice_cell::models::NewInvoice;
use invoice_cell::services::billing::BillingService;

use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, SchedulingError,
    UpdateAppointmentRequest,
};
use crate::services::availability::{available_slots, slot_grid};
use crate::services::notifications::{NotificationKind, Notifier};
use crate::store::{AppointmentStore, SlotWrite};

/// Orchestrates booking: doctor existence, working-hours containment,
/// conflict-free persistence, and invoice derivation.
pub struct SchedulingService {
    doctors: Arc<dyn DoctorStore>,
    appointments: Arc<dyn AppointmentStore>,
    billing: Arc<BillingService>,
    notifier: Arc<dyn Notifier>,
}

impl SchedulingService {
    pub fn new(
        doctors: Arc<dyn DoctorStore>,
        appointments: Arc<dyn AppointmentStore>,
        billing: Arc<BillingService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            doctors,
            appointments,
            billing,
            notifier,
        }
    }

    pub async fn create_appointment(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking appointment with doctor {} on {} at {}",
            request.doctor_id, request.date, request.time
        );

        let doctor = self.get_doctor(request.doctor_id).await?;

        // Report an occupied slot before the hours check, like the staff UI
        // expects; the insert below remains the authoritative check.
        if self.slot_is_booked(doctor.id, request.date, request.time).await? {
            return Err(SchedulingError::SlotTaken);
        }

        // Fail-open: a doctor without parseable working hours takes any
        // grid time. Both boundaries are bookable.
        if let Some(hours) = doctor.parsed_working_hours() {
            if !hours.contains(request.time) {
                return Err(SchedulingError::OutsideWorkingHours);
            }
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_first_name: request.patient_first_name,
            patient_last_name: request.patient_last_name,
            national_id: request.national_id,
            phone: request.phone,
            doctor_id: doctor.id,
            date: request.date,
            time: request.time,
            department: request.department,
            status: AppointmentStatus::Pending,
        };

        let appointment = match self
            .appointments
            .insert_unique(appointment)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
        {
            SlotWrite::Written(appointment) => appointment,
            // A concurrent booking won the slot between check and insert.
            SlotWrite::SlotTaken => return Err(SchedulingError::SlotTaken),
            SlotWrite::Missing => {
                return Err(SchedulingError::DatabaseError(
                    "insert reported a missing row".to_string(),
                ))
            }
        };

        self.derive_invoice(&appointment, &doctor).await?;
        self.send_confirmation(&appointment, &doctor).await;

        info!("Appointment {} booked with doctor {}", appointment.id, doctor.id);
        Ok(appointment)
    }

    pub async fn update_appointment(
        &self,
        id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        debug!("Updating appointment: {}", id);

        let current = self.get_appointment(id).await?;

        // Every mutable field is overwritten; the doctor reference is held
        // fixed.
        let updated = Appointment {
            id: current.id,
            patient_first_name: request.patient_first_name,
            patient_last_name: request.patient_last_name,
            national_id: request.national_id,
            phone: request.phone,
            doctor_id: current.doctor_id,
            date: request.date,
            time: request.time,
            department: request.department,
            status: request.status,
        };

        // The key check excludes the row itself, so keeping the same slot
        // never self-conflicts; a changed date or time is re-validated
        // against the doctor's other bookings in the same write.
        let write = self
            .appointments
            .update_unique(updated)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        match write {
            SlotWrite::Written(appointment) => Ok(appointment),
            SlotWrite::SlotTaken => Err(SchedulingError::SlotTaken),
            SlotWrite::Missing => Err(SchedulingError::NotFound),
        }
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), SchedulingError> {
        let deleted = self
            .appointments
            .delete(id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;

        if !deleted {
            return Err(SchedulingError::NotFound);
        }
        info!("Appointment {} deleted", id);
        Ok(())
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.appointments
            .find(id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::NotFound)
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, SchedulingError> {
        self.appointments
            .list()
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    pub async fn get_appointments_by_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.get_doctor(doctor_id).await?;
        self.appointments
            .find_by_doctor(doctor_id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    pub async fn get_appointments_by_patient(
        &self,
        national_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.appointments
            .find_by_patient(national_id, first_name, last_name)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    pub async fn get_appointments_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.appointments
            .find_by_date_range(start, end)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    pub async fn get_doctor_appointments_by_date_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        self.get_doctor(doctor_id).await?;
        self.appointments
            .find_by_doctor_and_date_range(doctor_id, start, end)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))
    }

    /// Remaining bookable grid times for a doctor on a date.
    pub async fn get_available_time_slots(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, SchedulingError> {
        let doctor = self.get_doctor(doctor_id).await?;

        let booked: HashSet<NaiveTime> = self
            .appointments
            .find_by_doctor_and_date(doctor_id, date)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .into_iter()
            .map(|appointment| appointment.time)
            .collect();

        Ok(available_slots(
            doctor.parsed_working_hours(),
            &booked,
            &slot_grid(),
        ))
    }

    async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, SchedulingError> {
        self.doctors
            .find(doctor_id)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?
            .ok_or(SchedulingError::DoctorNotFound)
    }

    async fn slot_is_booked(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, SchedulingError> {
        let existing = self
            .appointments
            .find_by_slot(doctor_id, date, time)
            .await
            .map_err(|e| SchedulingError::DatabaseError(e.to_string()))?;
        Ok(!existing.is_empty())
    }

    async fn derive_invoice(
        &self,
        appointment: &Appointment,
        doctor: &Doctor,
    ) -> Result<(), SchedulingError> {
        let new_invoice = NewInvoice {
            appointment_id: appointment.id,
            amount: doctor.consultation_fee,
            description: format!("{} visit - {}", doctor.specialty, doctor.full_name()),
        };

        if let Err(e) = self.billing.create_for_appointment(new_invoice).await {
            // The appointment stays persisted and queryable; surface the
            // gap so the caller retries invoice creation, not the booking.
            error!(
                "Invoice creation failed for appointment {}: {}",
                appointment.id, e
            );
            return Err(SchedulingError::InvoiceCreationFailed {
                appointment_id: appointment.id,
            });
        }
        Ok(())
    }

    async fn send_confirmation(&self, appointment: &Appointment, doctor: &Doctor) {
        let params = json!({
            "patient_name": appointment.patient_full_name(),
            "doctor_name": doctor.full_name(),
            "date": appointment.date,
            "time": appointment.time,
        });

        if let Err(e) = self
            .notifier
            .send(
                &appointment.phone,
                NotificationKind::AppointmentConfirmation,
                params,
            )
            .await
        {
            warn!(
                "Confirmation notification failed for appointment {}: {}",
                appointment.id, e
            );
        }
    }
}
