use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use validator::Validate;

use db::filters::CollegeFilter;
use db::models::college;
use db::repositories::{CollegeRepository, Repository};

use crate::error::{AppError, check_limit};

#[derive(Debug, Clone, Validate)]
pub struct CreateCollege {
    #[validate(length(min = 1, message = "id cannot be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    pub domain: Option<String>,
    pub address: Option<String>,
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCollege {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    pub domain: Option<String>,
    pub address: Option<String>,
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

pub struct CollegeService {
    repo: CollegeRepository,
}

impl CollegeService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: CollegeRepository::new(db),
        }
    }

    /// Registers a new college. The domain is normalized to lowercase so the
    /// unique index behaves case-insensitively.
    pub async fn create(&self, payload: CreateCollege) -> Result<college::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;

        let domain = payload.domain.map(|d| d.trim().to_lowercase());
        if let Some(domain) = &domain {
            if self.repo.find_by_domain(domain).await?.is_some() {
                return Err(AppError::Conflict {
                    field: "domain".to_string(),
                });
            }
        }

        let now = Utc::now();
        let model = self
            .repo
            .create(college::ActiveModel {
                id: Set(payload.id),
                name: Set(payload.name),
                domain: Set(domain),
                address: Set(payload.address),
                contact_email: Set(payload.contact_email),
                contact_phone: Set(payload.contact_phone),
                logo_url: Set(payload.logo_url),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "domain"))?;

        log::info!("registered college {} ({})", model.name, model.id);
        Ok(model)
    }

    pub async fn get(&self, id: &str) -> Result<college::Model, AppError> {
        self.repo
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("college"))
    }

    pub async fn get_by_domain(&self, domain: &str) -> Result<college::Model, AppError> {
        self.repo
            .find_by_domain(domain)
            .await?
            .ok_or_else(|| AppError::not_found("college"))
    }

    pub async fn list(
        &self,
        filter: &CollegeFilter,
        sort_by: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<college::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.list(filter, sort_by, skip, limit).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: UpdateCollege,
    ) -> Result<college::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;
        let existing = self.get(id).await?;

        let mut active: college::ActiveModel = existing.into();
        if let Some(name) = payload.name {
            active.name = Set(name);
        }
        if let Some(domain) = payload.domain {
            let domain = domain.trim().to_lowercase();
            if let Some(other) = self.repo.find_by_domain(&domain).await? {
                if other.id != id {
                    return Err(AppError::Conflict {
                        field: "domain".to_string(),
                    });
                }
            }
            active.domain = Set(Some(domain));
        }
        if let Some(address) = payload.address {
            active.address = Set(Some(address));
        }
        if let Some(contact_email) = payload.contact_email {
            active.contact_email = Set(Some(contact_email));
        }
        if let Some(contact_phone) = payload.contact_phone {
            active.contact_phone = Set(Some(contact_phone));
        }
        if let Some(logo_url) = payload.logo_url {
            active.logo_url = Set(Some(logo_url));
        }
        if let Some(is_active) = payload.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(self
            .repo
            .update(active)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "domain"))?)
    }

    /// Soft delete: the college keeps its rows but stops accepting activity.
    pub async fn deactivate(&self, id: &str) -> Result<college::Model, AppError> {
        self.update(
            id,
            UpdateCollege {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_id(id.to_string()).await?;
        if deleted == 0 {
            return Err(AppError::not_found("college"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;

    fn payload(id: &str, domain: Option<&str>) -> CreateCollege {
        CreateCollege {
            id: id.to_string(),
            name: format!("College {id}"),
            domain: domain.map(str::to_string),
            address: None,
            contact_email: None,
            contact_phone: None,
            logo_url: None,
        }
    }

    #[tokio::test]
    async fn duplicate_domain_is_a_conflict_regardless_of_case() {
        let db = setup_test_db().await;
        let service = CollegeService::new(db);

        service.create(payload("c1", Some("Tech.EDU"))).await.unwrap();
        let stored = service.get("c1").await.unwrap();
        assert_eq!(stored.domain.as_deref(), Some("tech.edu"));

        let err = service
            .create(payload("c2", Some("TECH.edu")))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn empty_name_fails_validation() {
        let db = setup_test_db().await;
        let service = CollegeService::new(db);

        let mut bad = payload("c1", None);
        bad.name = String::new();
        let err = service.create(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn missing_college_is_not_found() {
        let db = setup_test_db().await;
        let service = CollegeService::new(db);

        assert!(matches!(
            service.get("ghost").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.delete("ghost").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn deactivate_keeps_the_row() {
        let db = setup_test_db().await;
        let service = CollegeService::new(db);

        service.create(payload("c1", None)).await.unwrap();
        let college = service.deactivate("c1").await.unwrap();
        assert!(!college.is_active);
        assert!(service.get("c1").await.is_ok());
    }
}
