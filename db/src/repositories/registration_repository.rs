use crate::filters::RegistrationFilter;
use crate::models::{event, registration};
use crate::repositories::repository::Repository;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};

#[derive(Clone)]
pub struct RegistrationRepository {
    db: DatabaseConnection,
}

impl RegistrationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_student_and_event(
        &self,
        student_id: &str,
        event_id: &str,
    ) -> Result<Option<registration::Model>, DbErr> {
        registration::Entity::find()
            .filter(registration::Column::StudentId.eq(student_id))
            .filter(registration::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
    }

    /// Events a student is registered for, optionally narrowed to upcoming
    /// (`Some(true)`) or past (`Some(false)`) relative to `now`.
    pub async fn find_student_events(
        &self,
        student_id: &str,
        upcoming: Option<bool>,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, DbErr> {
        let mut query = event::Entity::find()
            .join(JoinType::InnerJoin, event::Relation::Registrations.def())
            .filter(registration::Column::StudentId.eq(student_id));

        match upcoming {
            Some(true) => query = query.filter(event::Column::StartTime.gt(now)),
            Some(false) => query = query.filter(event::Column::EndTime.lt(now)),
            None => {}
        }

        query
            .order_by_asc(event::Column::StartTime)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

impl Repository<registration::Entity, RegistrationFilter> for RegistrationRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(
        query: Select<registration::Entity>,
        filter: &RegistrationFilter,
    ) -> Select<registration::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(registration::Column::Id.eq(id.clone()));
        }
        if let Some(event_id) = &filter.event_id {
            condition = condition.add(registration::Column::EventId.eq(event_id.clone()));
        }
        if let Some(event_ids) = &filter.event_ids {
            condition = condition.add(registration::Column::EventId.is_in(event_ids.clone()));
        }
        if let Some(student_id) = &filter.student_id {
            condition = condition.add(registration::Column::StudentId.eq(student_id.clone()));
        }
        if let Some(student_ids) = &filter.student_ids {
            condition = condition.add(registration::Column::StudentId.is_in(student_ids.clone()));
        }
        if let Some(attended) = filter.attended {
            condition = condition.add(registration::Column::Attended.eq(attended));
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<registration::Entity>,
        sort_by: Option<String>,
    ) -> Select<registration::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "registered_at" => {
                    if asc {
                        query.order_by_asc(registration::Column::RegisteredAt)
                    } else {
                        query.order_by_desc(registration::Column::RegisteredAt)
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
        insert_college, insert_event, insert_registration, insert_student, setup_test_db,
    };
    use chrono::Duration;

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let db = setup_test_db().await;
        let repo = RegistrationRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        insert_event(&db, "ev1", "c1", "Talk", now, now + Duration::hours(2)).await;
        insert_registration(&db, "r1", "ev1", "s1").await;

        let duplicate = registration::ActiveModel {
            id: sea_orm::Set("r2".to_string()),
            event_id: sea_orm::Set("ev1".to_string()),
            student_id: sea_orm::Set("s1".to_string()),
            registered_at: sea_orm::Set(Utc::now()),
            attended: sea_orm::Set(false),
            ..Default::default()
        };
        let err = repo.create(duplicate).await.unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn student_events_split_by_upcoming_flag() {
        let db = setup_test_db().await;
        let repo = RegistrationRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        insert_event(
            &db,
            "old",
            "c1",
            "Old",
            now - Duration::days(2),
            now - Duration::days(1),
        )
        .await;
        insert_event(
            &db,
            "next",
            "c1",
            "Next",
            now + Duration::days(1),
            now + Duration::days(2),
        )
        .await;
        insert_registration(&db, "r1", "old", "s1").await;
        insert_registration(&db, "r2", "next", "s1").await;

        let upcoming = repo
            .find_student_events("s1", Some(true), now, 0, 100)
            .await
            .unwrap();
        assert_eq!(upcoming.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["next"]);

        let past = repo
            .find_student_events("s1", Some(false), now, 0, 100)
            .await
            .unwrap();
        assert_eq!(past.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["old"]);

        let all = repo
            .find_student_events("s1", None, now, 0, 100)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
