use rust_decimal_macros::dec;
use tracing::info;

use doctor_cell::models::{CreateDoctorRequest, DoctorError};
use doctor_cell::services::directory::DoctorDirectoryService;
use rust_decimal::Decimal;

/// Seeds the demo doctor roster for development deployments. Idempotent:
/// a non-empty directory is left untouched.
pub async fn seed_demo_doctors(directory: &DoctorDirectoryService) -> Result<(), DoctorError> {
    if directory.has_doctors().await? {
        info!("Doctor directory already populated, skipping demo seed");
        return Ok(());
    }

    for doctor in demo_doctors() {
        let created = directory.create_doctor(doctor).await?;
        info!("Seeded demo doctor {} ({})", created.full_name(), created.specialty);
    }
    Ok(())
}

fn demo_doctors() -> Vec<CreateDoctorRequest> {
    fn doctor(
        first_name: &str,
        last_name: &str,
        specialty: &str,
        years_experience: i32,
        about: &str,
        consultation_fee: Decimal,
    ) -> CreateDoctorRequest {
        CreateDoctorRequest {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            specialty: specialty.to_string(),
            years_experience,
            about: Some(about.to_string()),
            working_hours: Some("09:00-17:00".to_string()),
            consultation_fee,
        }
    }

    vec![
        doctor(
            "Ayse",
            "Kaya",
            "Orthodontics",
            8,
            "Specialist in dental misalignment and jaw problems.",
            dec!(800),
        ),
        doctor(
            "Mehmet",
            "Ozdemir",
            "Implantology",
            12,
            "Twelve years of implant treatment and oral surgery.",
            dec!(1200),
        ),
        doctor(
            "Zeynep",
            "Yilmaz",
            "Cosmetic Dentistry",
            10,
            "Smile design and cosmetic dental treatments.",
            dec!(1000),
        ),
        doctor(
            "Ali",
            "Demir",
            "Periodontology",
            7,
            "Gum disease diagnosis and treatment.",
            dec!(700),
        ),
        doctor(
            "Fatma",
            "Sahin",
            "Endodontics",
            9,
            "Root canal specialist.",
            dec!(600),
        ),
        doctor(
            "Hasan",
            "Koc",
            "Maxillofacial Surgery",
            15,
            "Jaw and oral surgery, impacted tooth extraction.",
            dec!(1500),
        ),
        doctor(
            "Elif",
            "Arslan",
            "Pediatric Dentistry",
            6,
            "Children's dental health in a friendly setting.",
            dec!(500),
        ),
        doctor(
            "Murat",
            "Celik",
            "Prosthodontics",
            11,
            "Full and partial dentures, porcelain and zirconium work.",
            dec!(900),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use doctor_cell::store::InMemoryDoctorStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeding_twice_does_not_duplicate_doctors() {
        let directory = DoctorDirectoryService::new(Arc::new(InMemoryDoctorStore::new()));

        seed_demo_doctors(&directory).await.unwrap();
        let first_count = directory.list_doctors().await.unwrap().len();
        assert_eq!(first_count, demo_doctors().len());

        seed_demo_doctors(&directory).await.unwrap();
        assert_eq!(directory.list_doctors().await.unwrap().len(), first_count);
    }

    #[tokio::test]
    async fn every_demo_doctor_has_parseable_working_hours() {
        for request in demo_doctors() {
            let hours = request.working_hours.unwrap();
            assert!(hours.parse::<doctor_cell::models::WorkingHours>().is_ok());
        }
    }
}
