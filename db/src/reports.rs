//! Read-only reporting queries over the event data.
//!
//! Every function scopes by `college_id` before anything else; an unknown id
//! simply produces an empty result (`None` / empty vec), never an error.
//! Grouped counts come from the database, final assembly and ordering happen
//! here so the output is deterministic.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QuerySelect,
};
use serde::Serialize;

use crate::models::event::EventType;
use crate::models::{attendance, event, feedback, registration, student};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPopularityRow {
    pub event_id: String,
    pub title: String,
    pub event_type: EventType,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue: Option<String>,
    pub registrations: i64,
    pub attendance_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub event_id: String,
    pub event_title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub venue: Option<String>,
    pub registered: u64,
    pub present: u64,
    pub absent: u64,
    /// `present / registered * 100`, two decimals; 0 when nobody registered.
    pub attendance_pct: f64,
    pub capacity: Option<i32>,
    /// `capacity - registered`; negative when over capacity, `None` when
    /// capacity is unlimited.
    pub remaining_capacity: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackSummary {
    pub event_id: String,
    pub event_title: String,
    pub avg_rating: f64,
    pub response_count: u64,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub five_stars: u64,
    pub four_stars: u64,
    pub three_stars: u64,
    pub two_stars: u64,
    pub one_star: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveStudentRow {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub roll_no: Option<String>,
    pub events_attended: u64,
    pub events_registered: u64,
    pub attendance_rate: f64,
    pub attended_events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub events_created: i64,
    pub registrations: i64,
    pub unique_students: i64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(FromQueryResult)]
struct EventCountRow {
    event_id: String,
    cnt: i64,
}

async fn registration_counts_by_event(
    db: &DatabaseConnection,
    event_ids: &[String],
) -> Result<HashMap<String, i64>, DbErr> {
    let rows: Vec<EventCountRow> = registration::Entity::find()
        .select_only()
        .column(registration::Column::EventId)
        .column_as(registration::Column::StudentId.count(), "cnt")
        .filter(registration::Column::EventId.is_in(event_ids.iter().cloned()))
        .group_by(registration::Column::EventId)
        .into_model::<EventCountRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.event_id, r.cnt)).collect())
}

async fn present_counts_by_event(
    db: &DatabaseConnection,
    event_ids: &[String],
) -> Result<HashMap<String, i64>, DbErr> {
    let rows: Vec<EventCountRow> = attendance::Entity::find()
        .select_only()
        .column(attendance::Column::EventId)
        .column_as(attendance::Column::StudentId.count(), "cnt")
        .filter(attendance::Column::EventId.is_in(event_ids.iter().cloned()))
        .filter(attendance::Column::Present.eq(true))
        .group_by(attendance::Column::EventId)
        .into_model::<EventCountRow>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.event_id, r.cnt)).collect())
}

/// Events ranked by registration count, attendance shown alongside.
/// Ties break on event id so repeated runs return the same order.
pub async fn event_popularity(
    db: &DatabaseConnection,
    college_id: &str,
    event_type: Option<EventType>,
    limit: u64,
) -> Result<Vec<EventPopularityRow>, DbErr> {
    let mut query = event::Entity::find().filter(event::Column::CollegeId.eq(college_id));
    if let Some(event_type) = event_type {
        query = query.filter(event::Column::EventType.eq(event_type));
    }
    let events = query.all(db).await?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
    let registrations = registration_counts_by_event(db, &event_ids).await?;
    let attendance = present_counts_by_event(db, &event_ids).await?;

    let mut rows: Vec<EventPopularityRow> = events
        .into_iter()
        .map(|e| EventPopularityRow {
            registrations: registrations.get(&e.id).copied().unwrap_or(0),
            attendance_count: attendance.get(&e.id).copied().unwrap_or(0),
            event_id: e.id,
            title: e.title,
            event_type: e.event_type,
            start_time: e.start_time,
            end_time: e.end_time,
            venue: e.venue,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.registrations
            .cmp(&a.registrations)
            .then_with(|| a.event_id.cmp(&b.event_id))
    });
    rows.truncate(limit as usize);
    Ok(rows)
}

/// Registration vs. attendance for one event. `None` when the event does not
/// exist in the given college.
pub async fn attendance_summary(
    db: &DatabaseConnection,
    college_id: &str,
    event_id: &str,
) -> Result<Option<AttendanceSummary>, DbErr> {
    let Some(event) = event::Entity::find()
        .filter(event::Column::CollegeId.eq(college_id))
        .filter(event::Column::Id.eq(event_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let registered_students: HashSet<String> = registration::Entity::find()
        .filter(registration::Column::EventId.eq(event_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.student_id)
        .collect();

    let mut present_students: HashSet<String> = HashSet::new();
    let mut absent_students: HashSet<String> = HashSet::new();
    for record in attendance::Entity::find()
        .filter(attendance::Column::EventId.eq(event_id))
        .all(db)
        .await?
    {
        if record.present {
            present_students.insert(record.student_id);
        } else {
            absent_students.insert(record.student_id);
        }
    }

    let registered = registered_students.len() as u64;
    let present = present_students.len() as u64;
    let attendance_pct = if registered == 0 {
        0.0
    } else {
        round2(present as f64 * 100.0 / registered as f64)
    };

    Ok(Some(AttendanceSummary {
        event_id: event.id,
        event_title: event.title,
        start_time: event.start_time,
        end_time: event.end_time,
        venue: event.venue,
        registered,
        present,
        absent: absent_students.len() as u64,
        attendance_pct,
        capacity: event.capacity,
        remaining_capacity: event.capacity.map(|c| c as i64 - registered as i64),
    }))
}

/// Rating statistics and star histogram for one event. `None` when the
/// event does not exist in the given college.
pub async fn feedback_summary(
    db: &DatabaseConnection,
    college_id: &str,
    event_id: &str,
) -> Result<Option<FeedbackSummary>, DbErr> {
    let Some(event) = event::Entity::find()
        .filter(event::Column::CollegeId.eq(college_id))
        .filter(event::Column::Id.eq(event_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let responses = feedback::Entity::find()
        .filter(feedback::Column::EventId.eq(event_id))
        .all(db)
        .await?;

    let mut histogram = [0u64; 5];
    let mut total = 0i64;
    for response in &responses {
        total += response.rating as i64;
        if (1..=5).contains(&response.rating) {
            histogram[(response.rating - 1) as usize] += 1;
        }
    }

    let response_count = responses.len() as u64;
    let avg_rating = if response_count == 0 {
        0.0
    } else {
        round2(total as f64 / response_count as f64)
    };

    Ok(Some(FeedbackSummary {
        event_id: event.id,
        event_title: event.title,
        avg_rating,
        response_count,
        min_rating: responses.iter().map(|f| f.rating).min(),
        max_rating: responses.iter().map(|f| f.rating).max(),
        five_stars: histogram[4],
        four_stars: histogram[3],
        three_stars: histogram[2],
        two_stars: histogram[1],
        one_star: histogram[0],
    }))
}

/// Students ranked by events attended. The optional date window restricts
/// which events are considered at all (for both the attended and registered
/// counts). Only students with at least one attended event appear.
pub async fn top_active_students(
    db: &DatabaseConnection,
    college_id: &str,
    limit: u64,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> Result<Vec<ActiveStudentRow>, DbErr> {
    let mut query = event::Entity::find().filter(event::Column::CollegeId.eq(college_id));
    if let Some(start) = start_date {
        query = query.filter(event::Column::StartTime.gte(start));
    }
    if let Some(end) = end_date {
        query = query.filter(event::Column::EndTime.lte(end));
    }
    let titles_by_event: HashMap<String, String> = query
        .all(db)
        .await?
        .into_iter()
        .map(|e| (e.id, e.title))
        .collect();
    if titles_by_event.is_empty() {
        return Ok(Vec::new());
    }
    let event_ids: Vec<String> = titles_by_event.keys().cloned().collect();

    let mut registered: HashMap<String, HashSet<String>> = HashMap::new();
    for row in registration::Entity::find()
        .filter(registration::Column::EventId.is_in(event_ids.clone()))
        .all(db)
        .await?
    {
        registered
            .entry(row.student_id)
            .or_default()
            .insert(row.event_id);
    }

    let mut attended: HashMap<String, (HashSet<String>, BTreeSet<String>)> = HashMap::new();
    for row in attendance::Entity::find()
        .filter(attendance::Column::EventId.is_in(event_ids))
        .filter(attendance::Column::Present.eq(true))
        .all(db)
        .await?
    {
        let entry = attended.entry(row.student_id).or_default();
        if let Some(title) = titles_by_event.get(&row.event_id) {
            entry.1.insert(title.clone());
        }
        entry.0.insert(row.event_id);
    }
    if attended.is_empty() {
        return Ok(Vec::new());
    }

    let students = student::Entity::find()
        .filter(student::Column::CollegeId.eq(college_id))
        .filter(student::Column::Id.is_in(attended.keys().cloned().collect::<Vec<_>>()))
        .all(db)
        .await?;

    let mut rows: Vec<ActiveStudentRow> = students
        .into_iter()
        .filter_map(|s| {
            let (attended_ids, attended_titles) = attended.get(&s.id)?;
            let events_attended = attended_ids.len() as u64;
            let events_registered = registered.get(&s.id).map_or(0, |set| set.len()) as u64;
            let attendance_rate = if events_registered == 0 {
                0.0
            } else {
                round2(events_attended as f64 * 100.0 / events_registered as f64)
            };
            Some(ActiveStudentRow {
                student_id: s.id,
                name: s.name,
                email: s.email,
                roll_no: s.roll_no,
                events_attended,
                events_registered,
                attendance_rate,
                attended_events: attended_titles.iter().cloned().collect(),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.events_attended
            .cmp(&a.events_attended)
            .then_with(|| {
                b.attendance_rate
                    .partial_cmp(&a.attendance_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.student_id.cmp(&b.student_id))
    });
    rows.truncate(limit as usize);
    Ok(rows)
}

/// Daily counts of events, registrations and distinct participating students
/// for events starting in the trailing `days` window, ascending by date.
pub async fn registration_trends(
    db: &DatabaseConnection,
    college_id: &str,
    days: i64,
    now: DateTime<Utc>,
) -> Result<Vec<TrendRow>, DbErr> {
    let cutoff = now - Duration::days(days);

    let events = event::Entity::find()
        .filter(event::Column::CollegeId.eq(college_id))
        .filter(event::Column::StartTime.gte(cutoff))
        .all(db)
        .await?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    #[derive(Default)]
    struct DayAccum {
        events_created: i64,
        registrations: i64,
        students: HashSet<String>,
    }

    let mut date_by_event: HashMap<String, NaiveDate> = HashMap::new();
    let mut days_map: BTreeMap<NaiveDate, DayAccum> = BTreeMap::new();
    for e in events {
        let date = e.start_time.date_naive();
        date_by_event.insert(e.id, date);
        days_map.entry(date).or_default().events_created += 1;
    }

    for row in registration::Entity::find()
        .filter(registration::Column::EventId.is_in(date_by_event.keys().cloned().collect::<Vec<_>>()))
        .all(db)
        .await?
    {
        if let Some(date) = date_by_event.get(&row.event_id) {
            let accum = days_map.entry(*date).or_default();
            accum.registrations += 1;
            accum.students.insert(row.student_id);
        }
    }

    Ok(days_map
        .into_iter()
        .map(|(date, accum)| TrendRow {
            date,
            events_created: accum.events_created,
            registrations: accum.registrations,
            unique_students: accum.students.len() as i64,
        })
        .collect())
}
