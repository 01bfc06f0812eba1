use crate::seed::Seeder;
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use services::user_service::{CreateUser, UserService};

pub struct UserSeeder;

#[async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let service = UserService::new(db.clone());
        service
            .create(CreateUser {
                username: "admin".to_string(),
                email: "admin@campus.test".to_string(),
                password: "admin-password".to_string(),
                admin: true,
            })
            .await
            .expect("seed admin user");
        service
            .create(CreateUser {
                username: "organizer".to_string(),
                email: "organizer@campus.test".to_string(),
                password: "organizer-password".to_string(),
                admin: false,
            })
            .await
            .expect("seed organizer user");
    }
}
