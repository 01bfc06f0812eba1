use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use validator::Validate;

use db::models::user;

use crate::error::AppError;

#[derive(Debug, Clone, Validate)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub admin: bool,
}

/// Organizer accounts. Kept deliberately small: create, look up, verify
/// credentials. Passwords are stored as argon2 hashes and never returned.
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::validation("password", format!("hashing failed: {e}")))?
            .to_string())
    }

    pub async fn create(&self, payload: CreateUser) -> Result<user::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;

        let hash = Self::hash_password(&payload.password)?;
        let model = user::ActiveModel {
            username: Set(payload.username.trim().to_lowercase()),
            email: Set(payload.email.trim().to_lowercase()),
            password_hash: Set(hash),
            admin: Set(payload.admin),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "username"))?;

        log::info!("created user {} ({})", model.username, model.id);
        Ok(model)
    }

    pub async fn get(&self, id: i64) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("user"))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username.to_lowercase()))
            .one(&self.db)
            .await?)
    }

    /// Checks a password against the stored hash and stamps `last_login` on
    /// success. Unknown usernames and wrong passwords are indistinguishable.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<user::Model>, AppError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::validation("password_hash", format!("invalid hash: {e}")))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }

        let mut active: user::ActiveModel = user.into();
        active.last_login = Set(Some(Utc::now()));
        Ok(Some(active.update(&self.db).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    fn payload(username: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: format!("{username}@campus.edu"),
            password: "correct horse battery".to_string(),
            admin: false,
        }
    }

    #[tokio::test]
    async fn password_is_hashed_and_verifiable() {
        let db = setup_test_db().await;
        let service = UserService::new(db);

        let user = service.create(payload("organizer")).await.unwrap();
        assert_ne!(user.password_hash, "correct horse battery");

        let verified = service
            .verify_credentials("Organizer", "correct horse battery")
            .await
            .unwrap();
        assert!(verified.is_some_and(|u| u.last_login.is_some()));

        let rejected = service
            .verify_credentials("organizer", "wrong password")
            .await
            .unwrap();
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let db = setup_test_db().await;
        let service = UserService::new(db);

        service.create(payload("organizer")).await.unwrap();
        let err = service.create(payload("organizer")).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn short_password_fails_validation() {
        let db = setup_test_db().await;
        let service = UserService::new(db);

        let mut bad = payload("organizer");
        bad.password = "short".to_string();
        assert!(matches!(
            service.create(bad).await.unwrap_err(),
            AppError::Validation { .. }
        ));
    }
}
