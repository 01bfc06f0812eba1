use crate::filters::EventFilter;
use crate::models::event;
use crate::repositories::repository::Repository;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};

#[derive(Clone)]
pub struct EventRepository {
    db: DatabaseConnection,
}

impl EventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Events that have not started yet: `start_time > now`.
    pub async fn find_upcoming(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, DbErr> {
        event::Entity::find()
            .filter(event::Column::CollegeId.eq(college_id))
            .filter(event::Column::StartTime.gt(now))
            .order_by_asc(event::Column::StartTime)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Events currently running: `start_time <= now <= end_time`.
    pub async fn find_ongoing(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, DbErr> {
        event::Entity::find()
            .filter(event::Column::CollegeId.eq(college_id))
            .filter(event::Column::StartTime.lte(now))
            .filter(event::Column::EndTime.gte(now))
            .order_by_asc(event::Column::StartTime)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }

    /// Events already over, most recently ended first.
    pub async fn find_past(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, DbErr> {
        event::Entity::find()
            .filter(event::Column::CollegeId.eq(college_id))
            .filter(event::Column::EndTime.lt(now))
            .order_by_desc(event::Column::EndTime)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

impl Repository<event::Entity, EventFilter> for EventRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(query: Select<event::Entity>, filter: &EventFilter) -> Select<event::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(event::Column::Id.eq(id.clone()));
        }
        if let Some(ids) = &filter.ids {
            condition = condition.add(event::Column::Id.is_in(ids.clone()));
        }
        if let Some(college_id) = &filter.college_id {
            condition = condition.add(event::Column::CollegeId.eq(college_id.clone()));
        }
        if let Some(event_type) = &filter.event_type {
            condition = condition.add(event::Column::EventType.eq(event_type.clone()));
        }
        if let Some(event_types) = &filter.event_types {
            condition = condition.add(event::Column::EventType.is_in(event_types.clone()));
        }
        if let Some(status) = &filter.status {
            condition = condition.add(event::Column::Status.eq(status.clone()));
        }
        if let Some(is_published) = filter.is_published {
            condition = condition.add(event::Column::IsPublished.eq(is_published));
        }
        if let Some(t) = filter.starts_after {
            condition = condition.add(event::Column::StartTime.gte(t));
        }
        if let Some(t) = filter.starts_before {
            condition = condition.add(event::Column::StartTime.lte(t));
        }
        if let Some(t) = filter.ends_after {
            condition = condition.add(event::Column::EndTime.gte(t));
        }
        if let Some(t) = filter.ends_before {
            condition = condition.add(event::Column::EndTime.lte(t));
        }
        if let Some(query_str) = &filter.query {
            condition = condition.add(
                sea_orm::Condition::any()
                    .add(event::Column::Title.like(format!("%{}%", query_str)))
                    .add(event::Column::Description.like(format!("%{}%", query_str)))
                    .add(event::Column::Venue.like(format!("%{}%", query_str))),
            );
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<event::Entity>,
        sort_by: Option<String>,
    ) -> Select<event::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "title" => {
                    if asc {
                        query.order_by_asc(event::Column::Title)
                    } else {
                        query.order_by_desc(event::Column::Title)
                    }
                }
                "start_time" => {
                    if asc {
                        query.order_by_asc(event::Column::StartTime)
                    } else {
                        query.order_by_desc(event::Column::StartTime)
                    }
                }
                "end_time" => {
                    if asc {
                        query.order_by_asc(event::Column::EndTime)
                    } else {
                        query.order_by_desc(event::Column::EndTime)
                    }
                }
                "created_at" => {
                    if asc {
                        query.order_by_asc(event::Column::CreatedAt)
                    } else {
                        query.order_by_desc(event::Column::CreatedAt)
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
    use crate::test_utils::{insert_college, insert_event, setup_test_db};
    use chrono::Duration;

    #[tokio::test]
    async fn time_window_queries_pivot_on_now() {
        let db = setup_test_db().await;
        let repo = EventRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        let now = Utc::now();

        insert_event(
            &db,
            "past",
            "c1",
            "Past",
            now - Duration::hours(4),
            now - Duration::hours(2),
        )
        .await;
        insert_event(
            &db,
            "ongoing",
            "c1",
            "Ongoing",
            now - Duration::hours(1),
            now + Duration::hours(1),
        )
        .await;
        insert_event(
            &db,
            "upcoming",
            "c1",
            "Upcoming",
            now + Duration::hours(2),
            now + Duration::hours(4),
        )
        .await;

        let upcoming = repo.find_upcoming("c1", now, 0, 100).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, "upcoming");

        let ongoing = repo.find_ongoing("c1", now, 0, 100).await.unwrap();
        assert_eq!(ongoing.len(), 1);
        assert_eq!(ongoing[0].id, "ongoing");

        let past = repo.find_past("c1", now, 0, 100).await.unwrap();
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].id, "past");
    }

    #[tokio::test]
    async fn substring_search_covers_title_and_venue() {
        let db = setup_test_db().await;
        let repo = EventRepository::new(db.clone());

        insert_college(&db, "c1", "Test U", None).await;
        let now = Utc::now();
        insert_event(&db, "ev1", "c1", "Rust Workshop", now, now + Duration::hours(1)).await;
        insert_event(&db, "ev2", "c1", "Career Fair", now, now + Duration::hours(1)).await;

        let hits = repo
            .find_all(
                &EventFilter::new().with_college_id("c1").with_query("rust"),
                None,
            )
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "ev1");
    }
}
