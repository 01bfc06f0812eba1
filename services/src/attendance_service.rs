use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};

use db::filters::AttendanceFilter;
use db::models::attendance::{self, CheckInMethod};
use db::models::{event, registration, student};
use db::repositories::{
    AttendanceRepository, EventRepository, RegistrationRepository, Repository, StudentRepository,
};

use crate::error::{AppError, check_limit};

pub struct AttendanceService {
    repo: AttendanceRepository,
    registrations: RegistrationRepository,
    events: EventRepository,
    students: StudentRepository,
}

impl AttendanceService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: AttendanceRepository::new(db.clone()),
            registrations: RegistrationRepository::new(db.clone()),
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
        if student.college_id != event.college_id {
            return Err(AppError::validation(
                "student_id",
                "student belongs to a different college",
            ));
        }
        Ok((event, student))
    }

    /// Marks a student present or absent at time `now`. Re-marking the same
    /// pair updates the existing record instead of creating a second one, so
    /// a correction from present to absent (or back) is a plain re-mark.
    ///
    /// Walk-ins are allowed: no registration is required, but when one
    /// exists its `attended` flag is kept in sync.
    pub async fn mark(
        &self,
        id: &str,
        event_id: &str,
        student_id: &str,
        present: bool,
        method: Option<CheckInMethod>,
        verified_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<attendance::Model, AppError> {
        let (event, student) = self.load_pair(event_id, student_id).await?;

        let model = match self
            .repo
            .find_by_student_and_event(student_id, event_id)
            .await?
        {
            Some(existing) => {
                let check_in = if present {
                    existing.check_in_time.or(Some(now))
                } else {
                    None
                };
                let mut active: attendance::ActiveModel = existing.into();
                active.present = Set(present);
                active.check_in_time = Set(check_in);
                if let Some(method) = method {
                    active.method = Set(Some(method));
                }
                if let Some(verified_by) = verified_by {
                    active.verified_by = Set(Some(verified_by));
                }
                self.repo.update(active).await?
            }
            None => {
                self.repo
                    .create(attendance::ActiveModel {
                        id: Set(id.to_string()),
                        event_id: Set(event.id.clone()),
                        student_id: Set(student.id.clone()),
                        present: Set(present),
                        check_in_time: Set(present.then_some(now)),
                        method: Set(method),
                        verified_by: Set(verified_by),
                        ..Default::default()
                    })
                    .await
                    .map_err(|e| AppError::conflict_on_unique(e, "attendance"))?
            }
        };

        if let Some(registration) = self
            .registrations
            .find_by_student_and_event(student_id, event_id)
            .await?
        {
            let mut active: registration::ActiveModel = registration.into();
            active.attended = Set(present);
            active.check_in_time = Set(model.check_in_time);
            self.registrations.update(active).await?;
        }

        log::info!(
            "marked student {} {} at event {}",
            model.student_id,
            if model.present { "present" } else { "absent" },
            model.event_id
        );
        Ok(model)
    }

    /// Records the check-out timestamp for a student already marked present.
    pub async fn check_out(
        &self,
        event_id: &str,
        student_id: &str,
        now: DateTime<Utc>,
    ) -> Result<attendance::Model, AppError> {
        let existing = self
            .repo
            .find_by_student_and_event(student_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("attendance record"))?;
        if !existing.present {
            return Err(AppError::validation(
                "student_id",
                "student was not marked present",
            ));
        }

        let mut active: attendance::ActiveModel = existing.into();
        active.check_out_time = Set(Some(now));
        let model = self.repo.update(active).await?;

        if let Some(registration) = self
            .registrations
            .find_by_student_and_event(student_id, event_id)
            .await?
        {
            let mut active: registration::ActiveModel = registration.into();
            active.check_out_time = Set(Some(now));
            self.registrations.update(active).await?;
        }

        Ok(model)
    }

    pub async fn get(&self, event_id: &str, student_id: &str) -> Result<attendance::Model, AppError> {
        self.repo
            .find_by_student_and_event(student_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("attendance record"))
    }

    pub async fn list_for_event(
        &self,
        event_id: &str,
        present: Option<bool>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<attendance::Model>, AppError> {
        check_limit(limit)?;
        let mut filter = AttendanceFilter::new().with_event_id(event_id);
        filter.present = present;
        Ok(self.repo.list(&filter, None, skip, limit).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use db::test_utils::{
        insert_college, insert_event, insert_registration, insert_student, setup_test_db,
    };

    async fn fixture(db: &DatabaseConnection) {
        insert_college(db, "c1", "Test U", None).await;
        insert_student(db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        insert_event(db, "ev1", "c1", "Talk", now, now + Duration::hours(2)).await;
    }

    #[tokio::test]
    async fn remark_updates_in_place() {
        let db = setup_test_db().await;
        fixture(&db).await;
        let service = AttendanceService::new(db);
        let now = Utc::now();

        let first = service
            .mark("a1", "ev1", "s1", true, Some(CheckInMethod::Manual), Some("admin".to_string()), now)
            .await
            .unwrap();
        assert!(first.present);
        assert!(first.check_in_time.is_some());

        // correction to absent reuses the same row and clears check-in
        let corrected = service
            .mark("a2", "ev1", "s1", false, None, None, now + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(corrected.id, first.id);
        assert!(!corrected.present);
        assert!(corrected.check_in_time.is_none());

        let records = service.list_for_event("ev1", None, 0, 100).await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn walk_in_without_registration_is_allowed() {
        let db = setup_test_db().await;
        fixture(&db).await;
        let service = AttendanceService::new(db);

        let record = service
            .mark("a1", "ev1", "s1", true, None, None, Utc::now())
            .await
            .unwrap();
        assert!(record.present);
    }

    #[tokio::test]
    async fn registration_attended_flag_stays_in_sync() {
        let db = setup_test_db().await;
        fixture(&db).await;
        insert_registration(&db, "r1", "ev1", "s1").await;
        let service = AttendanceService::new(db.clone());
        let now = Utc::now();

        service.mark("a1", "ev1", "s1", true, None, None, now).await.unwrap();
        let registration = RegistrationRepository::new(db)
            .find_by_student_and_event("s1", "ev1")
            .await
            .unwrap()
            .unwrap();
        assert!(registration.attended);
        assert!(registration.check_in_time.is_some());
    }

    #[tokio::test]
    async fn check_out_requires_a_present_mark() {
        let db = setup_test_db().await;
        fixture(&db).await;
        let service = AttendanceService::new(db);
        let now = Utc::now();

        assert!(matches!(
            service.check_out("ev1", "s1", now).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        service.mark("a1", "ev1", "s1", false, None, None, now).await.unwrap();
        assert!(matches!(
            service.check_out("ev1", "s1", now).await.unwrap_err(),
            AppError::Validation { .. }
        ));

        service.mark("a1", "ev1", "s1", true, None, None, now).await.unwrap();
        let record = service
            .check_out("ev1", "s1", now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(record.duration_minutes(), Some(60.0));
    }

    #[tokio::test]
    async fn marking_for_missing_event_is_not_found() {
        let db = setup_test_db().await;
        fixture(&db).await;
        let service = AttendanceService::new(db);

        let err = service
            .mark("a1", "ghost", "s1", true, None, None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
