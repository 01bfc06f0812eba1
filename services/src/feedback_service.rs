use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use validator::Validate;

use db::filters::FeedbackFilter;
use db::models::feedback;
use db::repositories::{EventRepository, FeedbackRepository, Repository, StudentRepository};

use crate::error::{AppError, check_limit};

#[derive(Debug, Clone, Validate)]
pub struct SubmitFeedback {
    #[validate(length(min = 1, message = "id cannot be empty"))]
    pub id: String,
    pub event_id: String,
    pub student_id: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "comment is too long"))]
    pub comment: Option<String>,
    pub is_anonymous: bool,
}

pub struct FeedbackService {
    repo: FeedbackRepository,
    events: EventRepository,
    students: StudentRepository,
}

impl FeedbackService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: FeedbackRepository::new(db.clone()),
            events: EventRepository::new(db.clone()),
            students: StudentRepository::new(db),
        }
    }

    /// Records one feedback entry per student per event. Feedback opens once
    /// the event has started; a second submission is a conflict.
    pub async fn submit(
        &self,
        payload: SubmitFeedback,
        now: DateTime<Utc>,
    ) -> Result<feedback::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;

        let event = self
            .events
            .find_by_id(payload.event_id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("event"))?;
        let student = self
            .students
            .find_by_id(payload.student_id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("student"))?;
        if student.college_id != event.college_id {
            return Err(AppError::validation(
                "student_id",
                "student belongs to a different college",
            ));
        }
        if event.is_upcoming(now) {
            return Err(AppError::validation(
                "event_id",
                "feedback opens once the event has started",
            ));
        }

        if self
            .repo
            .find_by_student_and_event(&student.id, &event.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict {
                field: "feedback".to_string(),
            });
        }

        let model = self
            .repo
            .create(feedback::ActiveModel {
                id: Set(payload.id),
                event_id: Set(event.id),
                student_id: Set(student.id),
                rating: Set(payload.rating),
                comment: Set(payload.comment),
                submitted_at: Set(now),
                is_anonymous: Set(payload.is_anonymous),
            })
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "feedback"))?;

        log::info!(
            "feedback {} recorded for event {}",
            model.id,
            model.event_id
        );
        Ok(model)
    }

    pub async fn get(&self, event_id: &str, student_id: &str) -> Result<feedback::Model, AppError> {
        self.repo
            .find_by_student_and_event(student_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("feedback"))
    }

    pub async fn list_for_event(
        &self,
        event_id: &str,
        sort_by: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<feedback::Model>, AppError> {
        check_limit(limit)?;
        Ok(self
            .repo
            .list(
                &FeedbackFilter::new().with_event_id(event_id),
                sort_by,
                skip,
                limit,
            )
            .await?)
    }

    pub async fn delete(&self, event_id: &str, student_id: &str) -> Result<(), AppError> {
        let feedback = self.get(event_id, student_id).await?;
        self.repo.delete_by_id(feedback.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use db::test_utils::{insert_college, insert_event, insert_student, setup_test_db};

    fn payload(id: &str, rating: i32) -> SubmitFeedback {
        SubmitFeedback {
            id: id.to_string(),
            event_id: "ev1".to_string(),
            student_id: "s1".to_string(),
            rating,
            comment: None,
            is_anonymous: false,
        }
    }

    async fn fixture(db: &DatabaseConnection, start: DateTime<Utc>) {
        insert_college(db, "c1", "Test U", None).await;
        insert_student(db, "s1", "c1", "Asha", "asha@test.edu").await;
        insert_event(db, "ev1", "c1", "Talk", start, start + Duration::hours(2)).await;
    }

    #[tokio::test]
    async fn rating_out_of_bounds_is_rejected() {
        let db = setup_test_db().await;
        let now = Utc::now();
        fixture(&db, now - Duration::hours(1)).await;
        let service = FeedbackService::new(db);

        for rating in [0, 6, -1] {
            let err = service
                .submit(payload("f1", rating), now)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }

        service.submit(payload("f1", 5), now).await.unwrap();
    }

    #[tokio::test]
    async fn feedback_before_the_event_starts_is_rejected() {
        let db = setup_test_db().await;
        let now = Utc::now();
        fixture(&db, now + Duration::days(1)).await;
        let service = FeedbackService::new(db);

        let err = service.submit(payload("f1", 4), now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn second_submission_is_a_conflict() {
        let db = setup_test_db().await;
        let now = Utc::now();
        fixture(&db, now - Duration::hours(1)).await;
        let service = FeedbackService::new(db);

        service.submit(payload("f1", 4), now).await.unwrap();
        let err = service.submit(payload("f2", 5), now).await.unwrap_err();
        assert!(err.is_conflict());

        // the original rating is preserved
        let stored = service.get("ev1", "s1").await.unwrap();
        assert_eq!(stored.rating, 4);
    }
}
