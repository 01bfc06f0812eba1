use crate::seed::Seeder;
use crate::seeds::COLLEGES;
use async_trait::async_trait;
use chrono::Utc;
use db::filters::AttendanceFilter;
use db::repositories::{AttendanceRepository, Repository};
use sea_orm::DatabaseConnection;
use services::feedback_service::{FeedbackService, SubmitFeedback};

pub struct FeedbackSeeder;

/// Students who attended a past event leave a rating skewed toward the
/// positive end.
#[async_trait]
impl Seeder for FeedbackSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        fastrand::seed(13);
        let attendance = AttendanceRepository::new(db.clone());
        let service = FeedbackService::new(db.clone());
        let now = Utc::now();

        for (college_id, _, _) in COLLEGES {
            for slug in ["tech-talk", "hack-night"] {
                let event_id = format!("{college_id}-{slug}");
                let present = attendance
                    .find_all(
                        &AttendanceFilter::new()
                            .with_event_id(&event_id)
                            .with_present(true),
                        None,
                    )
                    .await
                    .expect("load attendance");
                for row in present {
                    let rating = 2 + fastrand::i32(1..=3);
                    service
                        .submit(
                            SubmitFeedback {
                                id: format!("fb-{event_id}-{}", row.student_id),
                                event_id: event_id.clone(),
                                student_id: row.student_id,
                                rating,
                                comment: None,
                                is_anonymous: fastrand::f32() < 0.2,
                            },
                            now,
                        )
                        .await
                        .expect("seed feedback");
                }
            }
        }
    }
}
