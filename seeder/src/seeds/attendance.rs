use crate::seed::Seeder;
use crate::seeds::COLLEGES;
use async_trait::async_trait;
use chrono::Utc;
use db::filters::RegistrationFilter;
use db::models::attendance::CheckInMethod;
use db::repositories::{RegistrationRepository, Repository};
use sea_orm::DatabaseConnection;
use services::attendance_service::AttendanceService;

pub struct AttendanceSeeder;

/// Marks attendance for the two past events of each college. Most of the
/// registered students show up; the service keeps the registration rows in
/// sync as a side effect.
#[async_trait]
impl Seeder for AttendanceSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        fastrand::seed(11);
        let registrations = RegistrationRepository::new(db.clone());
        let service = AttendanceService::new(db.clone());
        let now = Utc::now();

        for (college_id, _, _) in COLLEGES {
            for slug in ["tech-talk", "hack-night"] {
                let event_id = format!("{college_id}-{slug}");
                let rows = registrations
                    .find_all(&RegistrationFilter::new().with_event_id(&event_id), None)
                    .await
                    .expect("load registrations");
                for row in rows {
                    let present = fastrand::f32() < 0.7;
                    service
                        .mark(
                            &format!("att-{event_id}-{}", row.student_id),
                            &event_id,
                            &row.student_id,
                            present,
                            Some(CheckInMethod::QrCode),
                            Some("organizer".to_string()),
                            now,
                        )
                        .await
                        .expect("seed attendance");
                }
            }
        }
    }
}
