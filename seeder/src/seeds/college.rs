use crate::seed::Seeder;
use crate::seeds::COLLEGES;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use services::college_service::{CollegeService, CreateCollege};

pub struct CollegeSeeder;

#[async_trait]
impl Seeder for CollegeSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let service = CollegeService::new(db.clone());
        for (id, name, domain) in COLLEGES {
            service
                .create(CreateCollege {
                    id: id.to_string(),
                    name: name.to_string(),
                    domain: Some(domain.to_string()),
                    address: None,
                    contact_email: Some(format!("events@{domain}")),
                    contact_phone: None,
                    logo_url: None,
                })
                .await
                .expect("seed college");
        }
    }
}
