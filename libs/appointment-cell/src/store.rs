// libs/appointment-cell/src/store.rs
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use invoice_cell::services::billing::AppointmentResolver;

use crate::models::Appointment;

/// Outcome of a conditional write against the (doctor, date, time) key.
#[derive(Debug)]
pub enum SlotWrite {
    Written(Appointment),
    /// Another appointment already holds the slot, whatever its status.
    SlotTaken,
    Missing,
}

/// Persistence seam for the appointment ledger. `insert_unique` and
/// `update_unique` are the engine's sole authority for the at-most-one
/// appointment per (doctor, date, time) invariant: implementations must
/// run the key check and the write as one atomic step.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert_unique(&self, appointment: Appointment) -> Result<SlotWrite>;
    async fn update_unique(&self, appointment: Appointment) -> Result<SlotWrite>;
    async fn find(&self, id: Uuid) -> Result<Option<Appointment>>;
    async fn find_by_slot(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Appointment>>;
    async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>>;
    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>>;
    async fn find_by_patient(
        &self,
        national_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Appointment>>;
    async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Appointment>>;
    async fn find_by_doctor_and_date_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>>;
    async fn list(&self) -> Result<Vec<Appointment>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Default)]
pub struct InMemoryAppointmentStore {
    inner: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_is_held(
        rows: &HashMap<Uuid, Appointment>,
        candidate: &Appointment,
    ) -> bool {
        rows.values().any(|row| {
            row.id != candidate.id
                && row.doctor_id == candidate.doctor_id
                && row.date == candidate.date
                && row.time == candidate.time
        })
    }

    fn sorted(mut rows: Vec<Appointment>) -> Vec<Appointment> {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.time.cmp(&b.time)));
        rows
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert_unique(&self, appointment: Appointment) -> Result<SlotWrite> {
        let mut inner = self.inner.write().await;
        if Self::slot_is_held(&inner, &appointment) {
            return Ok(SlotWrite::SlotTaken);
        }
        inner.insert(appointment.id, appointment.clone());
        Ok(SlotWrite::Written(appointment))
    }

    async fn update_unique(&self, appointment: Appointment) -> Result<SlotWrite> {
        let mut inner = self.inner.write().await;
        if !inner.contains_key(&appointment.id) {
            return Ok(SlotWrite::Missing);
        }
        if Self::slot_is_held(&inner, &appointment) {
            return Ok(SlotWrite::SlotTaken);
        }
        inner.insert(appointment.id, appointment.clone());
        Ok(SlotWrite::Written(appointment))
    }

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner.get(&id).cloned())
    }

    async fn find_by_slot(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .values()
            .filter(|row| row.doctor_id == doctor_id && row.date == date && row.time == time)
            .cloned()
            .collect())
    }

    async fn find_by_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(
            inner
                .values()
                .filter(|row| row.doctor_id == doctor_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(
            inner
                .values()
                .filter(|row| row.doctor_id == doctor_id && row.date == date)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_patient(
        &self,
        national_id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(
            inner
                .values()
                .filter(|row| {
                    row.national_id == national_id
                        && row.patient_first_name == first_name
                        && row.patient_last_name == last_name
                })
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(
            inner
                .values()
                .filter(|row| row.date >= start && row.date <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_doctor_and_date_range(
        &self,
        doctor_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(
            inner
                .values()
                .filter(|row| row.doctor_id == doctor_id && row.date >= start && row.date <= end)
                .cloned()
                .collect(),
        ))
    }

    async fn list(&self) -> Result<Vec<Appointment>> {
        let inner = self.inner.read().await;
        Ok(Self::sorted(inner.values().cloned().collect()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.remove(&id).is_some())
    }
}

/// Adapter that lets the billing service resolve doctor-scoped queries
/// without embedding appointment rows in the invoice cell.
pub struct StoreAppointmentResolver {
    store: Arc<dyn AppointmentStore>,
}

impl StoreAppointmentResolver {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AppointmentResolver for StoreAppointmentResolver {
    async fn appointment_ids_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Uuid>> {
        let appointments = self.store.find_by_doctor(doctor_id).await?;
        Ok(appointments.into_iter().map(|a| a.id).collect())
    }
}
