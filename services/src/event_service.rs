use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set};
use validator::Validate;

use db::filters::EventFilter;
use db::models::event::{self, EventStatus, EventType};
use db::repositories::{CollegeRepository, EventRepository, Repository};

use crate::error::{AppError, check_limit};

#[derive(Debug, Clone, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "id cannot be empty"))]
    pub id: String,
    pub college_id: String,
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue: Option<String>,
    #[validate(range(min = 0, message = "capacity cannot be negative"))]
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<EventType>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    #[validate(range(min = 0, message = "capacity cannot be negative"))]
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
}

/// URL-safe slug derived from the title: lowercase alphanumerics with
/// single dashes in between.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn check_schedule(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    registration_deadline: Option<DateTime<Utc>>,
) -> Result<(), AppError> {
    if end_time <= start_time {
        return Err(AppError::validation(
            "end_time",
            "end_time must be after start_time",
        ));
    }
    if let Some(deadline) = registration_deadline {
        if deadline > start_time {
            return Err(AppError::validation(
                "registration_deadline",
                "registration_deadline must not be after start_time",
            ));
        }
    }
    Ok(())
}

pub struct EventService {
    repo: EventRepository,
    colleges: CollegeRepository,
}

impl EventService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repo: EventRepository::new(db.clone()),
            colleges: CollegeRepository::new(db),
        }
    }

    /// Creates an event in draft state. Publishing is a separate step so
    /// organizers can stage details before students see anything.
    pub async fn create(&self, payload: CreateEvent) -> Result<event::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;
        check_schedule(
            payload.start_time,
            payload.end_time,
            payload.registration_deadline,
        )?;

        let college = self
            .colleges
            .find_by_id(payload.college_id.clone())
            .await?
            .ok_or_else(|| AppError::not_found("college"))?;
        if !college.is_active {
            return Err(AppError::validation(
                "college_id",
                "college is not accepting new events",
            ));
        }

        let now = Utc::now();
        let model = self
            .repo
            .create(event::ActiveModel {
                id: Set(payload.id),
                college_id: Set(college.id),
                slug: Set(Some(slugify(&payload.title))),
                title: Set(payload.title),
                description: Set(payload.description),
                event_type: Set(payload.event_type),
                status: Set(EventStatus::Draft),
                start_time: Set(payload.start_time),
                end_time: Set(payload.end_time),
                venue: Set(payload.venue),
                capacity: Set(payload.capacity),
                image_url: Set(payload.image_url),
                registration_deadline: Set(payload.registration_deadline),
                is_published: Set(false),
                created_by: Set(payload.created_by),
                created_at: Set(now),
                updated_at: Set(now),
            })
            .await?;

        log::info!("created event {} for college {}", model.id, model.college_id);
        Ok(model)
    }

    pub async fn get(&self, id: &str) -> Result<event::Model, AppError> {
        self.repo
            .find_by_id(id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("event"))
    }

    /// Like `get`, but the event must belong to the given college. Events of
    /// other tenants look exactly like missing ones.
    pub async fn get_scoped(&self, college_id: &str, id: &str) -> Result<event::Model, AppError> {
        let event = self.get(id).await?;
        if event.college_id != college_id {
            return Err(AppError::not_found("event"));
        }
        Ok(event)
    }

    pub async fn list(
        &self,
        filter: &EventFilter,
        sort_by: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.list(filter, sort_by, skip, limit).await?)
    }

    pub async fn upcoming(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.find_upcoming(college_id, now, skip, limit).await?)
    }

    pub async fn ongoing(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.find_ongoing(college_id, now, skip, limit).await?)
    }

    pub async fn past(
        &self,
        college_id: &str,
        now: DateTime<Utc>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<event::Model>, AppError> {
        check_limit(limit)?;
        Ok(self.repo.find_past(college_id, now, skip, limit).await?)
    }

    pub async fn update(&self, id: &str, payload: UpdateEvent) -> Result<event::Model, AppError> {
        payload
            .validate()
            .map_err(|e| AppError::from_validation_errors(&e))?;
        let existing = self.get(id).await?;

        // cross-field checks run against the merged schedule
        let start_time = payload.start_time.unwrap_or(existing.start_time);
        let end_time = payload.end_time.unwrap_or(existing.end_time);
        let deadline = payload
            .registration_deadline
            .or(existing.registration_deadline);
        check_schedule(start_time, end_time, deadline)?;

        let mut active: event::ActiveModel = existing.into();
        if let Some(title) = payload.title {
            active.slug = Set(Some(slugify(&title)));
            active.title = Set(title);
        }
        if let Some(description) = payload.description {
            active.description = Set(Some(description));
        }
        if let Some(event_type) = payload.event_type {
            active.event_type = Set(event_type);
        }
        if let Some(start_time) = payload.start_time {
            active.start_time = Set(start_time);
        }
        if let Some(end_time) = payload.end_time {
            active.end_time = Set(end_time);
        }
        if let Some(venue) = payload.venue {
            active.venue = Set(Some(venue));
        }
        if let Some(capacity) = payload.capacity {
            active.capacity = Set(Some(capacity));
        }
        if let Some(image_url) = payload.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(deadline) = payload.registration_deadline {
            active.registration_deadline = Set(Some(deadline));
        }
        active.updated_at = Set(Utc::now());

        Ok(self.repo.update(active).await?)
    }

    /// Makes the event visible to students. Cancelled events stay cancelled.
    pub async fn publish(&self, id: &str) -> Result<event::Model, AppError> {
        let existing = self.get(id).await?;
        if existing.status == EventStatus::Cancelled {
            return Err(AppError::validation(
                "status",
                "a cancelled event cannot be published",
            ));
        }

        let mut active: event::ActiveModel = existing.into();
        active.status = Set(EventStatus::Published);
        active.is_published = Set(true);
        active.updated_at = Set(Utc::now());
        Ok(self.repo.update(active).await?)
    }

    pub async fn cancel(&self, id: &str) -> Result<event::Model, AppError> {
        let existing = self.get(id).await?;
        if existing.status == EventStatus::Completed {
            return Err(AppError::validation(
                "status",
                "a completed event cannot be cancelled",
            ));
        }

        let mut active: event::ActiveModel = existing.into();
        active.status = Set(EventStatus::Cancelled);
        active.is_published = Set(false);
        active.updated_at = Set(Utc::now());
        Ok(self.repo.update(active).await?)
    }

    pub async fn complete(&self, id: &str) -> Result<event::Model, AppError> {
        let existing = self.get(id).await?;
        let mut active: event::ActiveModel = existing.into();
        active.status = Set(EventStatus::Completed);
        active.updated_at = Set(Utc::now());
        Ok(self.repo.update(active).await?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.repo.delete_by_id(id.to_string()).await?;
        if deleted == 0 {
            return Err(AppError::not_found("event"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use db::test_utils::{insert_college, setup_test_db};

    fn payload(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CreateEvent {
        CreateEvent {
            id: id.to_string(),
            college_id: "c1".to_string(),
            title: "Intro to Rust".to_string(),
            description: None,
            event_type: EventType::Workshop,
            start_time: start,
            end_time: end,
            venue: None,
            capacity: None,
            image_url: None,
            registration_deadline: None,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = EventService::new(db);

        let now = Utc::now();
        let err = service
            .create(payload("ev1", now, now - Duration::hours(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));

        // zero-length events are also invalid
        let err = service.create(payload("ev1", now, now)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn deadline_after_start_is_rejected() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = EventService::new(db);

        let now = Utc::now();
        let mut bad = payload("ev1", now, now + Duration::hours(2));
        bad.registration_deadline = Some(now + Duration::hours(1));
        let err = service.create(bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn new_events_start_as_unpublished_drafts() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = EventService::new(db);

        let now = Utc::now();
        let event = service
            .create(payload("ev1", now, now + Duration::hours(2)))
            .await
            .unwrap();
        assert_eq!(event.status, EventStatus::Draft);
        assert!(!event.is_published);
        assert_eq!(event.slug.as_deref(), Some("intro-to-rust"));

        let published = service.publish("ev1").await.unwrap();
        assert_eq!(published.status, EventStatus::Published);
        assert!(published.is_published);
    }

    #[tokio::test]
    async fn cancelled_events_cannot_be_republished() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "Test U", None).await;
        let service = EventService::new(db);

        let now = Utc::now();
        service
            .create(payload("ev1", now, now + Duration::hours(2)))
            .await
            .unwrap();
        service.cancel("ev1").await.unwrap();

        let err = service.publish("ev1").await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn scoped_get_hides_other_tenants() {
        let db = setup_test_db().await;
        insert_college(&db, "c1", "A", None).await;
        insert_college(&db, "c2", "B", None).await;
        let service = EventService::new(db);

        let now = Utc::now();
        service
            .create(payload("ev1", now, now + Duration::hours(2)))
            .await
            .unwrap();

        assert!(service.get_scoped("c1", "ev1").await.is_ok());
        assert!(matches!(
            service.get_scoped("c2", "ev1").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }
}
