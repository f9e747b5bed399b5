// libs/appointment-cell/tests/scheduling_test.rs
use std::sync::Arc;

use anyhow::{bail, Result};
use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentStatus, BookAppointmentRequest, SchedulingError, UpdateAppointmentRequest,
};
use appointment_cell::services::notifications::LogNotifier;
use appointment_cell::services::scheduling::SchedulingService;
use appointment_cell::store::{AppointmentStore, InMemoryAppointmentStore, StoreAppointmentResolver};
use doctor_cell::models::Doctor;
use doctor_cell::store::{DoctorStore, InMemoryDoctorStore};
use invoice_cell::models::{Invoice, InvoiceStatus};
use invoice_cell::services::billing::BillingService;
use invoice_cell::store::{InMemoryInvoiceStore, InvoiceStore};

struct Clinic {
    doctors: Arc<InMemoryDoctorStore>,
    billing: Arc<BillingService>,
    scheduling: SchedulingService,
}

fn clinic() -> Clinic {
    let doctors = Arc::new(InMemoryDoctorStore::new());
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let resolver = Arc::new(StoreAppointmentResolver::new(
        appointments.clone() as Arc<dyn AppointmentStore>
    ));
    let billing = Arc::new(BillingService::new(
        Arc::new(InMemoryInvoiceStore::new()),
        resolver,
    ));
    let scheduling = SchedulingService::new(
        doctors.clone(),
        appointments.clone(),
        billing.clone(),
        Arc::new(LogNotifier),
    );
    Clinic {
        doctors,
        billing,
        scheduling,
    }
}

async fn seed_doctor(store: &InMemoryDoctorStore, working_hours: Option<&str>) -> Doctor {
    let doctor = Doctor {
        id: Uuid::new_v4(),
        first_name: "Ayse".to_string(),
        last_name: "Kaya".to_string(),
        specialty: "Orthodontics".to_string(),
        years_experience: 8,
        about: None,
        working_hours: working_hours.map(str::to_string),
        consultation_fee: dec!(800.00),
    };
    store.insert(doctor).await.unwrap()
}

fn booking(doctor_id: Uuid, time: NaiveTime) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_first_name: "Ahmet".to_string(),
        patient_last_name: "Yilmaz".to_string(),
        national_id: "12345678901".to_string(),
        phone: "5551234567".to_string(),
        doctor_id,
        date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        time,
        department: "Orthodontics".to_string(),
    }
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn booking_creates_pending_appointment_and_invoice() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    let appointment = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.doctor_id, doctor.id);

    let invoice = clinic
        .billing
        .get_invoice_by_appointment(appointment.id)
        .await
        .unwrap();
    assert_eq!(invoice.amount, dec!(800.00));
    assert_eq!(invoice.status, InvoiceStatus::Pending);
    assert!(invoice.description.contains("Orthodontics"));
    assert!(invoice.description.contains("Ayse Kaya"));
}

#[tokio::test]
async fn double_booking_the_same_slot_is_rejected() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    let second = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await;
    assert_matches!(second, Err(SchedulingError::SlotTaken));

    assert_eq!(clinic.scheduling.list_appointments().await.unwrap().len(), 1);
}

#[tokio::test]
async fn cancelled_appointment_still_blocks_its_slot() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    let appointment = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    let update = UpdateAppointmentRequest {
        patient_first_name: appointment.patient_first_name.clone(),
        patient_last_name: appointment.patient_last_name.clone(),
        national_id: appointment.national_id.clone(),
        phone: appointment.phone.clone(),
        date: appointment.date,
        time: appointment.time,
        department: appointment.department.clone(),
        status: AppointmentStatus::Cancelled,
    };
    clinic
        .scheduling
        .update_appointment(appointment.id, update)
        .await
        .unwrap();

    let mut retry = booking(doctor.id, t(10, 0));
    retry.national_id = "98765432109".to_string();
    assert_matches!(
        clinic.scheduling.create_appointment(retry).await,
        Err(SchedulingError::SlotTaken)
    );
}

#[tokio::test]
async fn working_hour_boundaries_are_bookable_and_outside_is_not() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-16:30")).await;

    clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(9, 0)))
        .await
        .unwrap();

    let mut closing = booking(doctor.id, t(16, 30));
    closing.national_id = "98765432109".to_string();
    clinic.scheduling.create_appointment(closing).await.unwrap();

    let mut late = booking(doctor.id, t(17, 30));
    late.national_id = "11111111111".to_string();
    assert_matches!(
        clinic.scheduling.create_appointment(late).await,
        Err(SchedulingError::OutsideWorkingHours)
    );
}

#[tokio::test]
async fn malformed_working_hours_fail_open() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("not-a-schedule")).await;

    let appointment = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(16, 30)))
        .await
        .unwrap();
    assert_eq!(appointment.time, t(16, 30));

    let slots = clinic
        .scheduling
        .get_available_time_slots(doctor.id, appointment.date)
        .await
        .unwrap();
    assert_eq!(slots.len(), 11);
    assert!(!slots.contains(&t(16, 30)));
}

#[tokio::test]
async fn unknown_doctor_leaves_no_trace() {
    let clinic = clinic();

    let result = clinic
        .scheduling
        .create_appointment(booking(Uuid::new_v4(), t(10, 0)))
        .await;
    assert_matches!(result, Err(SchedulingError::DoctorNotFound));

    assert!(clinic.scheduling.list_appointments().await.unwrap().is_empty());
    assert!(clinic.billing.list_invoices().await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_bookings_yield_exactly_one_winner() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    let mut rival = booking(doctor.id, t(11, 0));
    rival.national_id = "98765432109".to_string();

    let (a, b) = tokio::join!(
        clinic.scheduling.create_appointment(booking(doctor.id, t(11, 0))),
        clinic.scheduling.create_appointment(rival),
    );

    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
    assert_eq!(clinic.scheduling.list_appointments().await.unwrap().len(), 1);
    assert_eq!(clinic.billing.list_invoices().await.unwrap().len(), 1);
}

#[tokio::test]
async fn available_slots_exclude_booked_and_out_of_hours_times() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-11:30")).await;

    clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    let slots = clinic
        .scheduling
        .get_available_time_slots(doctor.id, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
        .await
        .unwrap();

    assert_eq!(slots, vec![t(9, 0), t(9, 30), t(10, 30), t(11, 0), t(11, 30)]);
}

#[tokio::test]
async fn patient_lookup_matches_identity_exactly() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    let found = clinic
        .scheduling
        .get_appointments_by_patient("12345678901", "Ahmet", "Yilmaz")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let wrong_name = clinic
        .scheduling
        .get_appointments_by_patient("12345678901", "Mehmet", "Yilmaz")
        .await
        .unwrap();
    assert!(wrong_name.is_empty());
}

#[tokio::test]
async fn rescheduling_into_an_occupied_slot_is_rejected() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    let first = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();

    let mut second_request = booking(doctor.id, t(11, 0));
    second_request.national_id = "98765432109".to_string();
    let second = clinic
        .scheduling
        .create_appointment(second_request)
        .await
        .unwrap();

    let onto_first = UpdateAppointmentRequest {
        patient_first_name: second.patient_first_name.clone(),
        patient_last_name: second.patient_last_name.clone(),
        national_id: second.national_id.clone(),
        phone: second.phone.clone(),
        date: first.date,
        time: first.time,
        department: second.department.clone(),
        status: second.status,
    };
    assert_matches!(
        clinic.scheduling.update_appointment(second.id, onto_first).await,
        Err(SchedulingError::SlotTaken)
    );

    // Keeping its own slot never self-conflicts.
    let keep_slot = UpdateAppointmentRequest {
        patient_first_name: second.patient_first_name.clone(),
        patient_last_name: second.patient_last_name.clone(),
        national_id: second.national_id.clone(),
        phone: second.phone.clone(),
        date: second.date,
        time: second.time,
        department: second.department.clone(),
        status: AppointmentStatus::Confirmed,
    };
    let confirmed = clinic
        .scheduling
        .update_appointment(second.id, keep_slot)
        .await
        .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn deleting_an_unknown_appointment_reports_not_found() {
    let clinic = clinic();
    assert_matches!(
        clinic.scheduling.delete_appointment(Uuid::new_v4()).await,
        Err(SchedulingError::NotFound)
    );
}

#[tokio::test]
async fn deleted_appointment_frees_its_slot() {
    let clinic = clinic();
    let doctor = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;

    let appointment = clinic
        .scheduling
        .create_appointment(booking(doctor.id, t(10, 0)))
        .await
        .unwrap();
    clinic
        .scheduling
        .delete_appointment(appointment.id)
        .await
        .unwrap();

    let mut retry = booking(doctor.id, t(10, 0));
    retry.national_id = "98765432109".to_string();
    assert!(clinic.scheduling.create_appointment(retry).await.is_ok());
}

// ------------------------------------------------------------------------------
// Partial failure: booking persisted, invoice derivation failed
// ------------------------------------------------------------------------------

struct BrokenInvoiceStore;

#[async_trait]
impl InvoiceStore for BrokenInvoiceStore {
    async fn insert_unique(&self, _invoice: Invoice) -> Result<Option<Invoice>> {
        bail!("invoice ledger unavailable")
    }
    async fn find(&self, _id: Uuid) -> Result<Option<Invoice>> {
        Ok(None)
    }
    async fn find_by_appointment(&self, _appointment_id: Uuid) -> Result<Option<Invoice>> {
        Ok(None)
    }
    async fn list(&self) -> Result<Vec<Invoice>> {
        Ok(Vec::new())
    }
    async fn list_by_created_range(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>> {
        Ok(Vec::new())
    }
    async fn update(&self, _invoice: Invoice) -> Result<Option<Invoice>> {
        Ok(None)
    }
    async fn delete(&self, _id: Uuid) -> Result<bool> {
        Ok(false)
    }
}

#[tokio::test]
async fn invoice_failure_keeps_the_appointment_and_reports_its_id() {
    let doctors = Arc::new(InMemoryDoctorStore::new());
    let appointments = Arc::new(InMemoryAppointmentStore::new());
    let resolver = Arc::new(StoreAppointmentResolver::new(
        appointments.clone() as Arc<dyn AppointmentStore>
    ));
    let billing = Arc::new(BillingService::new(Arc::new(BrokenInvoiceStore), resolver));
    let scheduling = SchedulingService::new(
        doctors.clone(),
        appointments.clone(),
        billing,
        Arc::new(LogNotifier),
    );

    let doctor = seed_doctor(&doctors, Some("09:00-17:00")).await;
    let result = scheduling.create_appointment(booking(doctor.id, t(10, 0))).await;

    let appointment_id = match result {
        Err(SchedulingError::InvoiceCreationFailed { appointment_id }) => appointment_id,
        other => panic!("expected invoice failure, got {:?}", other.map(|a| a.id)),
    };

    let persisted = appointments.find(appointment_id).await.unwrap().unwrap();
    assert_eq!(persisted.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn doctor_scoped_invoice_queries_follow_the_appointment_ledger() {
    let clinic = clinic();
    let orthodontist = seed_doctor(&clinic.doctors, Some("09:00-17:00")).await;
    let implantologist = clinic
        .doctors
        .insert(Doctor {
            id: Uuid::new_v4(),
            first_name: "Mehmet".to_string(),
            last_name: "Ozdemir".to_string(),
            specialty: "Implantology".to_string(),
            years_experience: 12,
            about: None,
            working_hours: Some("09:00-17:00".to_string()),
            consultation_fee: dec!(1200.00),
        })
        .await
        .unwrap();

    clinic
        .scheduling
        .create_appointment(booking(orthodontist.id, t(10, 0)))
        .await
        .unwrap();
    let mut implant_booking = booking(implantologist.id, t(10, 0));
    implant_booking.national_id = "98765432109".to_string();
    let implant_appointment = clinic
        .scheduling
        .create_appointment(implant_booking)
        .await
        .unwrap();

    let implant_invoices = clinic
        .billing
        .list_invoices_by_doctor(implantologist.id)
        .await
        .unwrap();
    assert_eq!(implant_invoices.len(), 1);
    assert_eq!(implant_invoices[0].appointment_id, implant_appointment.id);
    assert_eq!(implant_invoices[0].amount, dec!(1200.00));

    // Revenue counts paid invoices only.
    assert_eq!(clinic.billing.total_revenue().await.unwrap(), dec!(0));
    clinic
        .billing
        .mark_paid(implant_invoices[0].id)
        .await
        .unwrap();
    assert_eq!(clinic.billing.total_revenue().await.unwrap(), dec!(1200.00));
    assert_eq!(
        clinic.billing.doctor_revenue(orthodontist.id).await.unwrap(),
        dec!(0)
    );
}
