use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum CheckInMethod {
    #[sea_orm(string_value = "qr_code")]
    QrCode,
    #[default]
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "nfc")]
    Nfc,
    #[sea_orm(string_value = "face_recognition")]
    FaceRecognition,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "other")]
    Other,
}

/// Attendance is tracked independently of registration so walk-ins can be
/// marked present without a prior registration row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub event_id: String,
    pub student_id: String,
    pub present: bool,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub method: Option<CheckInMethod>,
    pub verified_by: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id"
    )]
    Student,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Minutes between check-in and check-out, when both are recorded.
    pub fn duration_minutes(&self) -> Option<f64> {
        match (self.check_in_time, self.check_out_time) {
            (Some(check_in), Some(check_out)) => {
                Some((check_out - check_in).num_seconds() as f64 / 60.0)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn duration_requires_both_timestamps() {
        let check_in = Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap();
        let mut record = Model {
            id: "a1".into(),
            event_id: "ev1".into(),
            student_id: "s1".into(),
            present: true,
            check_in_time: Some(check_in),
            check_out_time: None,
            method: Some(CheckInMethod::Manual),
            verified_by: None,
            notes: None,
        };

        assert_eq!(record.duration_minutes(), None);

        record.check_out_time = Some(check_in + Duration::minutes(90));
        assert_eq!(record.duration_minutes(), Some(90.0));
    }
}
