use crate::seed::Seeder;
use crate::seeds::{COLLEGES, STUDENTS_PER_COLLEGE};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::registration;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub struct RegistrationSeeder;

/// Registers roughly three quarters of each college's students for each of
/// its events. Rows are written directly so past events get history too.
#[async_trait]
impl Seeder for RegistrationSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        fastrand::seed(7);
        let now = Utc::now();

        for (college_id, _, _) in COLLEGES {
            for slug in ["tech-talk", "hack-night", "career-fair", "rust-workshop"] {
                let event_id = format!("{college_id}-{slug}");
                for i in 1..=STUDENTS_PER_COLLEGE {
                    if fastrand::f32() > 0.75 {
                        continue;
                    }
                    let student_id = format!("{college_id}-s{i:02}");
                    registration::ActiveModel {
                        id: Set(format!("reg-{event_id}-{student_id}")),
                        event_id: Set(event_id.clone()),
                        student_id: Set(student_id),
                        registered_at: Set(now - Duration::days(10)),
                        attended: Set(false),
                        ..Default::default()
                    }
                    .insert(db)
                    .await
                    .expect("seed registration");
                }
            }
        }
    }
}
