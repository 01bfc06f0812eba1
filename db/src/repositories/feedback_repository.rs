use crate::filters::FeedbackFilter;
use crate::models::feedback;
use crate::repositories::repository::Repository;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

#[derive(Clone)]
pub struct FeedbackRepository {
    db: DatabaseConnection,
}

impl FeedbackRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_student_and_event(
        &self,
        student_id: &str,
        event_id: &str,
    ) -> Result<Option<feedback::Model>, DbErr> {
        feedback::Entity::find()
            .filter(feedback::Column::StudentId.eq(student_id))
            .filter(feedback::Column::EventId.eq(event_id))
            .one(&self.db)
            .await
    }
}

impl Repository<feedback::Entity, FeedbackFilter> for FeedbackRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(
        query: Select<feedback::Entity>,
        filter: &FeedbackFilter,
    ) -> Select<feedback::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(feedback::Column::Id.eq(id.clone()));
        }
        if let Some(event_id) = &filter.event_id {
            condition = condition.add(feedback::Column::EventId.eq(event_id.clone()));
        }
        if let Some(event_ids) = &filter.event_ids {
            condition = condition.add(feedback::Column::EventId.is_in(event_ids.clone()));
        }
        if let Some(student_id) = &filter.student_id {
            condition = condition.add(feedback::Column::StudentId.eq(student_id.clone()));
        }
        if let Some(rating) = filter.rating {
            condition = condition.add(feedback::Column::Rating.eq(rating));
        }
        if let Some(ratings) = &filter.ratings {
            condition = condition.add(feedback::Column::Rating.is_in(ratings.clone()));
        }
        if let Some(is_anonymous) = filter.is_anonymous {
            condition = condition.add(feedback::Column::IsAnonymous.eq(is_anonymous));
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<feedback::Entity>,
        sort_by: Option<String>,
    ) -> Select<feedback::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "submitted_at" => {
                    if asc {
                        query.order_by_asc(feedback::Column::SubmittedAt)
                    } else {
                        query.order_by_desc(feedback::Column::SubmittedAt)
                    }
                }
                "rating" => {
                    if asc {
                        query.order_by_asc(feedback::Column::Rating)
                    } else {
                        query.order_by_desc(feedback::Column::Rating)
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
        insert_college, insert_event, insert_feedback, insert_student, setup_test_db,
    };
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn one_feedback_per_student_per_event() {
        let db = setup_test_db().await;
        let repo = FeedbackRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        let now = Utc::now();
        insert_event(&db, "ev1", "c1", "Talk", now, now + Duration::hours(2)).await;
        insert_feedback(&db, "f1", "ev1", "s1", 4).await;

        let duplicate = feedback::ActiveModel {
            id: sea_orm::Set("f2".to_string()),
            event_id: sea_orm::Set("ev1".to_string()),
            student_id: sea_orm::Set("s1".to_string()),
            rating: sea_orm::Set(5),
            submitted_at: sea_orm::Set(Utc::now()),
            is_anonymous: sea_orm::Set(false),
            ..Default::default()
        };
        let err = repo.create(duplicate).await.unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));

        let existing = repo.find_by_student_and_event("s1", "ev1").await.unwrap();
        assert_eq!(existing.map(|f| f.rating), Some(4));
    }

    #[tokio::test]
    async fn rating_set_filter_selects_members_only() {
        let db = setup_test_db().await;
        let repo = FeedbackRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        insert_student(&db, "s1", "c1", "Asha", "asha@test.edu").await;
        insert_student(&db, "s2", "c1", "Ben", "ben@test.edu").await;
        insert_student(&db, "s3", "c1", "Cara", "cara@test.edu").await;
        let now = Utc::now();
        insert_event(&db, "ev1", "c1", "Talk", now, now + Duration::hours(2)).await;
        insert_feedback(&db, "f1", "ev1", "s1", 2).await;
        insert_feedback(&db, "f2", "ev1", "s2", 4).await;
        insert_feedback(&db, "f3", "ev1", "s3", 5).await;

        let hits = repo
            .find_all(
                &FeedbackFilter::new().with_event_id("ev1").with_ratings([4, 5]),
                None,
            )
            .await
            .unwrap();
        let mut ids: Vec<&str> = hits.iter().map(|f| f.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["f2", "f3"]);
    }
}
