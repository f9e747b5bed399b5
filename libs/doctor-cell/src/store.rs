// libs/doctor-cell/src/store.rs
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Doctor;

/// Persistence seam for the doctor directory. The scheduling engine and the
/// directory service only ever talk to this trait.
#[async_trait]
pub trait DoctorStore: Send + Sync {
    async fn insert(&self, doctor: Doctor) -> Result<Doctor>;
    async fn find(&self, id: Uuid) -> Result<Option<Doctor>>;
    async fn list(&self) -> Result<Vec<Doctor>>;
    async fn update(&self, doctor: Doctor) -> Result<Option<Doctor>>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// In-process store used by the single-node deployment and the test suites.
#[derive(Default)]
pub struct InMemoryDoctorStore {
    inner: RwLock<HashMap<Uuid, Doctor>>,
}

impl InMemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn insert(&self, doctor: Doctor) -> Result<Doctor> {
        let mut inner = self.inner.write().await;
        inner.insert(doctor.id, doctor.clone());
        Ok(doctor)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Doctor>> {
        let inner = self.inner.read().await;
        Ok(inner.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Doctor>> {
        let inner = self.inner.read().await;
        let mut doctors: Vec<Doctor> = inner.values().cloned().collect();
        doctors.sort_by(|a, b| a.last_name.cmp(&b.last_name).then(a.first_name.cmp(&b.first_name)));
        Ok(doctors)
    }

    async fn update(&self, doctor: Doctor) -> Result<Option<Doctor>> {
        let mut inner = self.inner.write().await;
        if !inner.contains_key(&doctor.id) {
            return Ok(None);
        }
        inner.insert(doctor.id, doctor.clone());
        Ok(Some(doctor))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.remove(&id).is_some())
    }
}
