use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[sea_orm(string_value = "workshop")]
    Workshop,
    #[sea_orm(string_value = "seminar")]
    Seminar,
    #[sea_orm(string_value = "conference")]
    Conference,
    #[sea_orm(string_value = "hackathon")]
    Hackathon,
    #[sea_orm(string_value = "webinar")]
    Webinar,
    #[sea_orm(string_value = "meetup")]
    Meetup,
    #[default]
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub college_id: String,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub status: EventStatus,
    pub start_time: DateTime<Utc>,
    /// Strictly after `start_time`; enforced before persistence.
    pub end_time: DateTime<Utc>,
    pub venue: Option<String>,
    /// `None` means unlimited.
    pub capacity: Option<i32>,
    pub image_url: Option<String>,
    /// At or before `start_time` when set.
    pub registration_deadline: Option<DateTime<Utc>>,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::college::Entity",
        from = "Column::CollegeId",
        to = "super::college::Column::Id"
    )]
    College,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedbacks,
}

impl Related<super::college::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::College.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedbacks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Scheduling state is derived from an explicit clock value so the
    /// same loaded row answers consistently inside one request.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }

    pub fn is_ongoing(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.end_time < now
    }

    /// Unlimited-capacity events are never full.
    pub fn is_full(&self, registration_count: u64) -> bool {
        match self.capacity {
            Some(capacity) => registration_count >= capacity.max(0) as u64,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event_at(start: DateTime<Utc>, end: DateTime<Utc>, capacity: Option<i32>) -> Model {
        Model {
            id: "ev1".into(),
            college_id: "c1".into(),
            title: "Talk".into(),
            slug: None,
            description: None,
            event_type: EventType::Seminar,
            status: EventStatus::Published,
            start_time: start,
            end_time: end,
            venue: None,
            capacity,
            image_url: None,
            registration_deadline: None,
            is_published: true,
            created_by: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn scheduling_state_pivots_on_now() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap();
        let end = start + Duration::hours(2);
        let event = event_at(start, end, None);

        let before = start - Duration::minutes(1);
        assert!(event.is_upcoming(before));
        assert!(!event.is_ongoing(before));
        assert!(!event.is_past(before));

        // boundaries are inclusive for ongoing
        assert!(event.is_ongoing(start));
        assert!(event.is_ongoing(end));

        let after = end + Duration::minutes(1);
        assert!(event.is_past(after));
        assert!(!event.is_upcoming(after));
    }

    #[test]
    fn is_full_respects_unlimited_capacity() {
        let start = Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap();
        let end = start + Duration::hours(1);

        let unlimited = event_at(start, end, None);
        assert!(!unlimited.is_full(10_000));

        let limited = event_at(start, end, Some(2));
        assert!(!limited.is_full(1));
        assert!(limited.is_full(2));
        assert!(limited.is_full(3));
    }
}
