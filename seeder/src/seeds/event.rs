use crate::seed::Seeder;
use crate::seeds::COLLEGES;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::event::{self, EventStatus, EventType};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub struct EventSeeder;

/// (slug, title, type, start offset in days from now, capacity)
const EVENTS: [(&str, &str, EventType, i64, Option<i32>); 4] = [
    ("tech-talk", "Tech Talk: Systems in Practice", EventType::Seminar, -7, Some(100)),
    ("hack-night", "Overnight Hackathon", EventType::Hackathon, -3, Some(50)),
    ("career-fair", "Spring Career Fair", EventType::Other, 3, None),
    ("rust-workshop", "Intro to Rust Workshop", EventType::Workshop, 10, Some(40)),
];

#[async_trait]
impl Seeder for EventSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let now = Utc::now();
        for (college_id, _, _) in COLLEGES {
            for (slug, title, event_type, offset_days, capacity) in EVENTS {
                let start = now + Duration::days(offset_days);
                event::ActiveModel {
                    id: Set(format!("{college_id}-{slug}")),
                    college_id: Set(college_id.to_string()),
                    title: Set(title.to_string()),
                    slug: Set(Some(slug.to_string())),
                    description: Set(None),
                    event_type: Set(event_type),
                    status: Set(EventStatus::Published),
                    start_time: Set(start),
                    end_time: Set(start + Duration::hours(3)),
                    venue: Set(Some("Main Auditorium".to_string())),
                    capacity: Set(capacity),
                    image_url: Set(None),
                    registration_deadline: Set(Some(start - Duration::hours(1))),
                    is_published: Set(true),
                    created_by: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(db)
                .await
                .expect("seed event");
            }
        }
    }
}
