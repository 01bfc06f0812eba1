use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};
use validator::Validate;

use db::filters::StudentFilter;
use db::models::student;
use db::repositories::{CollegeRepository, Repository, StudentRepository};

use crate::error::{AppError, check_limit};

#[derive(Debug, Clone, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, message = "id cannot be empty"))]
    pub id: String,
    pub college_id: String,
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    pub roll_no: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "batch_year is out of range"))]
    pub batch_year: Option<i32>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
    pub roll_no: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "batch_year is out of range"))]
    pub batch_year: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct StudentService {
    repo: StudentRepository,
    colleges: CollegeRepository,
}

impl StudentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: StudentRepository::new(db.clone()),
            colleges: CollegeRepository::new(db),
        }
    }

    /// Enrolls a student into a college. Email is stored lowercase and is
    /// globally unique; the roll number is unique within the college.
    pub async fn create(&self, payload: CreateStudent) -> Result<student::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;

        let college = self
            .colleges
            .find_by_id(payload.college_id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("college"))?;
        if !college.is_active {
            return Err(AppError::validation(
                "college_id",
                "college is not accepting new students",
            ));
        }

        if let Some(roll_no) = &payload.roll_no {
            if self
                .repo
                .find_by_roll_no(&college.id, roll_no)
                .await?
                .is_some()
            {
                return Err(AppError::Conflict {
                    field: "roll_no".to_string(),
                });
            }
        }

        let now = Utc::now();
        let model = self
            .repo
            .create(student::ActiveModel {
                id: Set(payload.id),
                college_id: Set(college.id),
                name: Set(payload.name),
                email: Set(payload.email.trim().to_lowercase()),
                roll_no: Set(payload.roll_no.map(|r| r.trim().to_lowercase())),
                phone: Set(payload.phone),
                department: Set(payload.department),
                batch_year: Set(payload.batch_year),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "email"))?;

        log::info!("enrolled student {} in college {}", model.id, model.college_id);
        Ok(model)
    }

    pub async fn get(&self, id: &str) -> Result<student::Model, AppError> {
        self.repo
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("student"))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<student::Model, AppError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("student"))
    }

    pub async fn list(
        &self,
        filter: &StudentFilter,
        sort_by: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<student::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.list(filter, sort_by, skip, limit).await?)
    }

    pub async fn update(
        &self,
        id: &str,
        payload: UpdateStudent,
    ) -> Result<student::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;
        let existing = self.get(id).await?;
        let college_id = existing.college_id.clone();

        let mut active: student::ActiveModel = existing.into();
        if let Some(name) = payload.name {
            active.name = Set(name);
        }
        if let Some(email) = payload.email {
            active.email = Set(email.trim().to_lowercase());
        }
        if let Some(roll_no) = payload.roll_no {
            let roll_no = roll_no.trim().to_lowercase();
            if let Some(other) = self.repo.find_by_roll_no(&college_id, &roll_no).await? {
                if other.id != id {
                    return Err(AppError::Conflict {
                        field: "roll_no".to_string(),
                    });
                }
            }
            active.roll_no = Set(Some(roll_no));
        }
        if let Some(phone) = payload.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(department) = payload.department {
            active.department = Set(Some(department));
        }
        if let Some(batch_year) = payload.batch_year {
            active.batch_year = Set(Some(batch_year));
        }
        if let Some(is_active) = payload.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        Ok(self
            .repo
            .update(active)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "email"))?)
    }

    pub async fn deactivate(&self, id: &str) -> Result<student::Model, AppError> {
        self.update(
            id,
            UpdateStudent {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_id(id.to_string()).await?;
        if deleted == 0 {
            return Err(AppError::not_found("student"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::{insert_college, setup_test_db};

    fn payload(id: &str, college_id: &str, email: &str, roll_no: Option<&str>) -> CreateStudent {
        CreateStudent {
            id: id.to_string(),
            college_id: college_id.to_string(),
            name: format!("Student {id}"),
            email: email.to_string(),
            roll_no: roll_no.map(str::to_string),
            phone: None,
            department: None,
            batch_year: None,
        }
    }

    #[tokio::test]
    async fn email_must_be_globally_unique_case_insensitively() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "A", None).await;
        insert_college(&db, "c2", "B", None).await;
        let service = StudentService::new(db);

        service
            .create(payload("s1", "c1", "Asha@Example.edu", None))
            .await
            .unwrap();

        // even in a different college
        let err = service
            .create(payload("s2", "c2", "asha@example.EDU", None))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn roll_no_is_scoped_to_the_college() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "A", None).await;
        insert_college(&db, "c2", "B", None).await;
        let service = StudentService::new(db);

        service
            .create(payload("s1", "c1", "one@a.edu", Some("CS-001")))
            .await
            .unwrap();

        let err = service
            .create(payload("s2", "c1", "two@a.edu", Some("cs-001")))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // same roll number in another college is fine
        service
            .create(payload("s3", "c2", "three@b.edu", Some("CS-001")))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_college_is_not_found() {
        let db = setup_test_db().await;
        let service = StudentService::new(db);

        let err = service
            .create(payload("s1", "ghost", "x@y.edu", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_email_fails_validation() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "A", None).await;
        let service = StudentService::new(db);

        let err = service
            .create(payload("s1", "c1", "not-an-email", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
