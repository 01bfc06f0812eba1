use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, ModelTrait, Set};

use db::filters::RegistrationFilter;
use db::models::event::EventStatus;
use db::models::{event, registration, student};
use db::repositories::{
    EventRepository, RegistrationRepository, Repository, StudentRepository,
};

use crate::error::{AppError, check_limit};

pub struct RegistrationService {
    repo: RegistrationRepository,
    events: EventRepository,
    students: StudentRepository,
}

impl RegistrationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: RegistrationRepository::new(db.clone()),
            events: EventRepository::new(db.clone()),
            students: StudentRepository::new(db),
        }
    }

    async fn load_pair(
        &self,
        event_id: &str,
        student_id: &str,
    ) -> Result<(event::Model, student::Model), AppError> {
        let event = self
            .events
            .find_by_id(event_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("event"))?;
        let student = self
            .students
            .find_by_id(student_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("student"))?;
        Ok((event, student))
    }

    /// Registers a student for an event at time `now`.
    ///
    /// The event must be published and open: not cancelled, within the
    /// registration deadline (the start time when no deadline is set), and
    /// under capacity. The student must be active and belong to the event's
    /// college. A second registration for the same pair is a conflict.
    pub async fn register(
        &self,
        id: &str,
        event_id: &str,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> Result<registration::Model, AppError> {
        let (event, student) = self.load_pair(event_id, student_id).await?;

        if student.college_id != event.college_id {
            return Err(AppError::validation(
                "student_id",
                "student belongs to a different college",
            ));
        }
        if !student.is_active {
            return Err(AppError::validation("student_id", "student is not active"));
        }
        if event.status != EventStatus::Published || !event.is_published {
            return Err(AppError::validation(
                "event_id",
                "event is not open for registration",
            ));
        }
        let deadline = event.registration_deadline.unwrap_or(event.start_time);
        if now > deadline {
            return Err(AppError::validation(
                "event_id",
                "registration deadline has passed",
            ));
        }

        let registered = self
            .repo
            .count(&RegistrationFilter::new().with_event_id(event_id))
            .await?;
        if event.is_full(registered) {
            return Err(AppError::validation("event_id", "event is full"));
        }

        if self
            .repo
            .find_by_student_and_event(student_id, event_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict {
                field: "registration".to_string(),
            });
        }

        let model = self
            .repo
            .create(registration::ActiveModel {
                id: Set(id.to_string()),
                event_id: Set(event.id),
                student_id: Set(student.id),
                registered_at: Set(now),
                attended: Set(false),
                ..Default::default()
            })
            .await
            .map_err(|e| AppError::conflict_on_unique(e, "registration"))?;

        log::info!("student {} registered for event {}", model.student_id, model.event_id);
        Ok(model)
    }

    pub async fn unregister(&self, event_id: &str, student_id: &str) -> Result<(), AppError> {
        let registration = self
            .repo
            .find_by_student_and_event(student_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("registration"))?;
        registration.delete(self.repo.db()).await?;
        Ok(())
    }

    pub async fn list_for_event(
        &self,
        event_id: &str,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<registration::Model>, AppError> {
        check_limit(limit)?;
        Ok(self
            .repo
            .list(
                &RegistrationFilter::new().with_event_id(event_id),
                None,
                skip,
                limit,
            )
            .await?)
    }

    /// Events on a student's calendar, optionally narrowed to upcoming or
    /// past relative to `now`.
    pub async fn student_events(
        &self,
        student_id: &str,
        upcoming: Option<bool>,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, AppError> {
        check_limit(limit)?;
        self.students
            .find_by_id(student_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("student"))?;
        Ok(self
            .repo
            .find_student_events(student_id, upcoming, now, skip, limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use db::test_utils::{insert_college, insert_event, insert_student, setup_test_db};
    use sea_orm::ActiveModelTrait;

    async fn open_event(
        db: &DatabaseConnection,
        id: &str,
        college_id: &str,
        start: DateTime<Utc>,
        capacity: Option<i32>,
    ) {
        let event = insert_event(db, id, college_id, "Talk", start, start + Duration::hours(2)).await;
        let mut active: event::ActiveModel = event.into();
        active.capacity = Set(capacity);
        active.update(db).await.unwrap();
    }

    #[tokio::test]
    async fn register_then_duplicate_is_conflict() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        open_event(&db, "ev1", "c1", now + Duration::days(1), None).await;
        let service = RegistrationService::new(db);

        service.register("r1", "ev1", "s1", now).await.unwrap();
        let err = service.register("r2", "ev1", "s1", now).await.unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn full_event_rejects_new_registrations() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        insert_student(&db, "s2", "c1", "Ben", "ben@test.edu").await;
        let now = Utc::now();
        open_event(&db, "ev1", "c1", now + Duration::days(1), Some(1)).await;
        let service = RegistrationService::new(db);

        service.register("r1", "ev1", "s1", now).await.unwrap();
        let err = service.register("r2", "ev1", "s2", now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn registration_closes_at_the_deadline() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        // without an explicit deadline the start time closes registration
        open_event(&db, "ev1", "c1", now - Duration::hours(1), None).await;
        let service = RegistrationService::new(db);

        let err = service.register("r1", "ev1", "s1", now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn cross_college_registration_is_rejected() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "A", None).await;
        insert_college(&db, "c2", "B", None).await;
        insert_student(&db, "s1", "c2", "Outsider", "out@b.edu").await;
        let now = Utc::now();
        open_event(&db, "ev1", "c1", now + Duration::days(1), None).await;
        let service = RegistrationService::new(db);

        let err = service.register("r1", "ev1", "s1", now).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn unregister_removes_the_row() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        open_event(&db, "ev1", "c1", now + Duration::days(1), None).await;
        let service = RegistrationService::new(db);

        service.register("r1", "ev1", "s1", now).await.unwrap();
        service.unregister("ev1", "s1").await.unwrap();

        // a second unregister finds nothing
        assert!(matches!(
            service.unregister("ev1", "s1").await.unwrap_err(),
            AppError::NotFound(_)
        ));

        // and the student can register again
        service.register("r2", "ev1", "s1", now).await.unwrap();
    }
}
