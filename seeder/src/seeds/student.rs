use crate::seed::Seeder;
use crate::seeds::{COLLEGES, STUDENTS_PER_COLLEGE};
use async_trait::async_trait;
use fake::Fake;
use fake::faker::name::en::Name;
use sea_orm::DatabaseConnection;
use services::student_service::{CreateStudent, StudentService};

pub struct StudentSeeder;

#[async_trait]
impl Seeder for StudentSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let service = StudentService::new(db.clone());
        for (college_id, _, domain) in COLLEGES {
            for i in 1..=STUDENTS_PER_COLLEGE {
                let name: String = Name().fake();
                service
                    .create(CreateStudent {
                        id: format!("{college_id}-s{i:02}"),
                        college_id: college_id.to_string(),
                        name,
                        email: format!("student{i:02}@{domain}"),
                        roll_no: Some(format!("cs-{i:03}")),
                        phone: None,
                        department: Some("Computer Science".to_string()),
                        batch_year: Some(2024 + (i % 3) as i32),
                    })
                    .await
                    .expect("seed student");
            }
        }
    }
}
