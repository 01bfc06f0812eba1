use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

use db::models::event::EventType;
use db::reports::{
    self, ActiveStudentRow, AttendanceSummary, EventPopularityRow, FeedbackSummary, TrendRow,
};
use db::repositories::{CollegeRepository, Repository};

use crate::error::{AppError, check_limit};

/// Thin validation layer over the report queries: bounds-checks arguments,
/// resolves the college, and turns a missing event into `NotFound`.
pub struct ReportService {
    db: DatabaseConnection,
    colleges: CollegeRepository,
}

impl ReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            colleges: CollegeRepository::new(db.clone()),
            db,
        }
    }

    async fn check_college(&self, college_id: &str) -> Result<(), AppError> {
        self.colleges
            .find_by_id(college_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("college"))?;
        Ok(())
    }

    pub async fn event_popularity(
        &self,
        college_id: &str,
        event_type: Option<EventType>,
        limit: u64,
    ) -> Result<Vec<EventPopularityRow>, AppError> {
        check_limit(limit)?;
        self.check_college(college_id).await?;
        Ok(reports::event_popularity(&self.db, college_id, event_type, limit).await?)
    }

    pub async fn attendance_summary(
        &self,
        college_id: &str,
        event_id: &str,
    ) -> Result<AttendanceSummary, AppError> {
        self.check_college(college_id).await?;
        reports::attendance_summary(&self.db, college_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("event"))
    }

    pub async fn feedback_summary(
        &self,
        college_id: &str,
        event_id: &str,
    ) -> Result<FeedbackSummary, AppError> {
        self.check_college(college_id).await?;
        reports::feedback_summary(&self.db, college_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("event"))
    }

    pub async fn top_active_students(
        &self,
        college_id: &str,
        limit: u64,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<ActiveStudentRow>, AppError> {
        check_limit(limit)?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(AppError::validation(
                    "end_date",
                    "end_date must not be before start_date",
                ));
            }
        }
        self.check_college(college_id).await?;
        Ok(reports::top_active_students(&self.db, college_id, limit, start_date, end_date).await?)
    }

    pub async fn registration_trends(
        &self,
        college_id: &str,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<TrendRow>, AppError> {
        if !(1..=365).contains(&days) {
            return Err(AppError::validation(
                "days",
                "days must be between 1 and 365",
            ));
        }
        self.check_college(college_id).await?;
        Ok(reports::registration_trends(&self.db, college_id, days, now).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::{insert_college, setup_test_db};

    #[tokio::test]
    async fn unknown_college_is_not_found() {
        let db = setup_test_db().await;
        let service = ReportService::new(db);

        assert!(matches!(
            service.event_popularity("ghost", None, 10).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = ReportService::new(db);

        assert!(matches!(
            service.attendance_summary("c1", "ghost").await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            service.feedback_summary("c1", "ghost").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn argument_bounds_are_enforced() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = ReportService::new(db);

        assert!(matches!(
            service.event_popularity("c1", None, 0).await.unwrap_err(),
            AppError::Validation { .. }
        ));
        assert!(matches!(
            service
                .registration_trends("c1", 400, Utc::now())
                .await
                .unwrap_err(),
            AppError::Validation { .. }
        ));

        let now = Utc::now();
        assert!(matches!(
            service
                .top_active_students("c1", 10, Some(now), Some(now - chrono::Duration::days(1)))
                .await
                .unwrap_err(),
            AppError::Validation { .. }
        ));
    }

    #[tokio::test]
    async fn empty_college_yields_empty_reports() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = ReportService::new(db);

        assert!(service.event_popularity("c1", None, 10).await.unwrap().is_empty());
        assert!(service
            .top_active_students("c1", 10, None, None)
            .await
            .unwrap()
            .is_empty());
        assert!(service
            .registration_trends("c1", 30, Utc::now())
            .await
            .unwrap()
            .is_empty());
    }
}
