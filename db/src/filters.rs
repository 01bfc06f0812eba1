use crate::models::attendance::CheckInMethod;
use crate::models::event::{EventStatus, EventType};
use chrono::{DateTime, Utc};

/// Per-entity filter types consumed by the repositories. Scalar fields are
/// exact matches, `Vec` fields are membership tests (empty vec matches
/// nothing), and the free-text `query` field is a case-insensitive
/// substring search across the entity's text columns.

#[derive(Debug, Clone, Default)]
pub struct CollegeFilter {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub name: Option<String>,
    pub domain: Option<String>,
    pub is_active: Option<bool>,
    pub query: Option<String>,
}

impl CollegeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub college_id: Option<String>,
    pub email: Option<String>,
    pub roll_no: Option<String>,
    pub department: Option<String>,
    pub batch_year: Option<i32>,
    pub batch_years: Option<Vec<i32>>,
    pub is_active: Option<bool>,
    pub query: Option<String>,
}

impl StudentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_college_id(mut self, college_id: impl Into<String>) -> Self {
        self.college_id = Some(college_id.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_roll_no(mut self, roll_no: impl Into<String>) -> Self {
        self.roll_no = Some(roll_no.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_batch_year(mut self, batch_year: i32) -> Self {
        self.batch_year = Some(batch_year);
        self
    }

    pub fn with_batch_years(mut self, batch_years: impl IntoIterator<Item = i32>) -> Self {
        self.batch_years = Some(batch_years.into_iter().collect());
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub id: Option<String>,
    pub ids: Option<Vec<String>>,
    pub college_id: Option<String>,
    pub event_type: Option<EventType>,
    pub event_types: Option<Vec<EventType>>,
    pub status: Option<EventStatus>,
    pub is_published: Option<bool>,
    pub starts_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    pub ends_after: Option<DateTime<Utc>>,
    pub ends_before: Option<DateTime<Utc>>,
    pub query: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_college_id(mut self, college_id: impl Into<String>) -> Self {
        self.college_id = Some(college_id.into());
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_event_types(mut self, event_types: impl IntoIterator<Item = EventType>) -> Self {
        self.event_types = Some(event_types.into_iter().collect());
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_is_published(mut self, is_published: bool) -> Self {
        self.is_published = Some(is_published);
        self
    }

    pub fn with_starts_after(mut self, t: DateTime<Utc>) -> Self {
        self.starts_after = Some(t);
        self
    }

    pub fn with_starts_before(mut self, t: DateTime<Utc>) -> Self {
        self.starts_before = Some(t);
        self
    }

    pub fn with_ends_after(mut self, t: DateTime<Utc>) -> Self {
        self.ends_after = Some(t);
        self
    }

    pub fn with_ends_before(mut self, t: DateTime<Utc>) -> Self {
        self.ends_before = Some(t);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub id: Option<String>,
    pub event_id: Option<String>,
    pub event_ids: Option<Vec<String>>,
    pub student_id: Option<String>,
    pub student_ids: Option<Vec<String>>,
    pub attended: Option<bool>,
}

impl RegistrationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_event_ids(mut self, event_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.event_ids = Some(event_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_student_ids(
        mut self,
        student_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.student_ids = Some(student_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_attended(mut self, attended: bool) -> Self {
        self.attended = Some(attended);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub id: Option<String>,
    pub event_id: Option<String>,
    pub event_ids: Option<Vec<String>>,
    pub student_id: Option<String>,
    pub student_ids: Option<Vec<String>>,
    pub present: Option<bool>,
    pub method: Option<CheckInMethod>,
}

impl AttendanceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_event_ids(mut self, event_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.event_ids = Some(event_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_student_ids(
        mut self,
        student_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.student_ids = Some(student_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_present(mut self, present: bool) -> Self {
        self.present = Some(present);
        self
    }

    pub fn with_method(mut self, method: CheckInMethod) -> Self {
        self.method = Some(method);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub id: Option<String>,
    pub event_id: Option<String>,
    pub event_ids: Option<Vec<String>>,
    pub student_id: Option<String>,
    pub rating: Option<i32>,
    pub ratings: Option<Vec<i32>>,
    pub is_anonymous: Option<bool>,
}

impl FeedbackFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_student_id(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn with_event_ids(mut self, event_ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.event_ids = Some(event_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rating(mut self, rating: i32) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_ratings(mut self, ratings: impl IntoIterator<Item = i32>) -> Self {
        self.ratings = Some(ratings.into_iter().collect());
        self
    }

    pub fn with_is_anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = Some(is_anonymous);
        self
    }
}
