use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::models::{attendance, college, event, feedback, registration, student};

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

// Fixture builders used by repository, report and service tests.

pub async fn insert_college(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    domain: Option<&str>,
) -> college::Model {
    college::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        domain: Set(domain.map(|d| d.to_lowercase())),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert college")
}

pub async fn insert_student(
    db: &DatabaseConnection,
    id: &str,
    college_id: &str,
    name: &str,
    email: &str,
) -> student::Model {
    student::ActiveModel {
        id: Set(id.to_string()),
        college_id: Set(college_id.to_string()),
        name: Set(name.to_string()),
        email: Set(email.to_lowercase()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert student")
}

pub async fn insert_event(
    db: &DatabaseConnection,
    id: &str,
    college_id: &str,
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> event::Model {
    event::ActiveModel {
        id: Set(id.to_string()),
        college_id: Set(college_id.to_string()),
        title: Set(title.to_string()),
        event_type: Set(event::EventType::Other),
        status: Set(event::EventStatus::Published),
        start_time: Set(start_time),
        end_time: Set(end_time),
        is_published: Set(true),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert event")
}

pub async fn insert_registration(
    db: &DatabaseConnection,
    id: &str,
    event_id: &str,
    student_id: &str,
) -> registration::Model {
    registration::ActiveModel {
        id: Set(id.to_string()),
        event_id: Set(event_id.to_string()),
        student_id: Set(student_id.to_string()),
        registered_at: Set(Utc::now()),
        attended: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert registration")
}

pub async fn insert_attendance(
    db: &DatabaseConnection,
    id: &str,
    event_id: &str,
    student_id: &str,
    present: bool,
) -> attendance::Model {
    attendance::ActiveModel {
        id: Set(id.to_string()),
        event_id: Set(event_id.to_string()),
        student_id: Set(student_id.to_string()),
        present: Set(present),
        method: Set(Some(attendance::CheckInMethod::Manual)),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert attendance")
}

pub async fn insert_feedback(
    db: &DatabaseConnection,
    id: &str,
    event_id: &str,
    student_id: &str,
    rating: i32,
) -> feedback::Model {
    feedback::ActiveModel {
        id: Set(id.to_string()),
        event_id: Set(event_id.to_string()),
        student_id: Set(student_id.to_string()),
        rating: Set(rating),
        submitted_at: Set(Utc::now()),
        is_anonymous: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert feedback")
}
