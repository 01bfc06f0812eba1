use crate::filters::AttendanceFilter;
use crate::models::attendance;
use crate::repositories::repository::Repository;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

#[derive(Clone)]
pub struct AttendanceRepository {
    db: DatabaseConnection,
}

impl AttendanceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The (event, student) pair is unique, so this is the natural key for
    /// upserting a mark.
    pub async fn find_by_student_and_event(
        &self,
        student_id: &str,
        event_id: &str,
    ) -> Result<Option<attendance::Model>, DbErr> {
        attendance::Entity::find()
            .filter(attendance::Column::StudentId.eq(student_id))
            .filter(attendance::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
    }
}

impl Repository<attendance::Entity, AttendanceFilter> for AttendanceRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(
        query: Select<attendance::Entity>,
        filter: &AttendanceFilter,
    ) -> Select<attendance::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(attendance::Column::Id.eq(id.clone()));
        }
        if let Some(event_id) = &filter.event_id {
            condition = condition.add(attendance::Column::EventId.eq(event_id.clone()));
        }
        if let Some(event_ids) = &filter.event_ids {
            condition = condition.add(attendance::Column::EventId.is_in(event_ids.clone()));
        }
        if let Some(student_id) = &filter.student_id {
            condition = condition.add(attendance::Column::StudentId.eq(student_id.clone()));
        }
        if let Some(student_ids) = &filter.student_ids {
            condition = condition.add(attendance::Column::StudentId.is_in(student_ids.clone()));
        }
        if let Some(present) = filter.present {
            condition = condition.add(attendance::Column::Present.eq(present));
        }
        if let Some(method) = &filter.method {
            condition = condition.add(attendance::Column::Method.eq(method.clone()));
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<attendance::Entity>,
        sort_by: Option<String>,
    ) -> Select<attendance::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "check_in_time" => {
                    if asc {
                        query.order_by_asc(attendance::Column::CheckInTime)
                    } else {
                        query.order_by_desc(attendance::Column::CheckInTime)
                    }
                }
                _ => query,
            };
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        insert_attendance, insert_college, insert_event, insert_student, setup_test_db,
    };
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn present_filter_selects_only_present_rows() {
        let db = setup_test_db().await;
        let repo = AttendanceRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        insert_student(&db, "s2", "c1", "Ben", "ben@test.edu").await;
        let now = Utc::now();
        insert_event(&db, "ev1", "c1", "Talk", now, now + Duration::hours(2)).await;

        insert_attendance(&db, "a1", "ev1", "s1", true).await;
        insert_attendance(&db, "a2", "ev1", "s2", false).await;

        let present = repo
            .find_all(
                &AttendanceFilter::new().with_event_id("ev1").with_present(true),
                None,
            )
            .await
            .unwrap();
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].student_id, "s1");

        let pair = repo.find_by_student_and_event("s2", "ev1").await.unwrap();
        assert!(pair.is_some_and(|a| !a.present));
    }
}
