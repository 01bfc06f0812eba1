use crate::filters::StudentFilter;
use crate::models::student;
use crate::repositories::repository::Repository;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

#[derive(Clone)]
pub struct StudentRepository {
    db: DatabaseConnection,
}

impl StudentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Emails are stored lowercase, making the unique lookup
    /// case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Roll numbers are only unique within a college, so the tenant id is
    /// part of the lookup key.
    pub async fn find_by_roll_no(
        &self,
        college_id: &str,
        roll_no: &str,
    ) -> Result<Option<student::Model>, DbErr> {
        student::Entity::find()
            .filter(student::Column::CollegeId.eq(college_id))
            .filter(student::Column::RollNo.eq(roll_no.to_lowercase()))
            .one(&self.db)
            .await
    }
}

impl Repository<student::Entity, StudentFilter> for StudentRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(
        query: Select<student::Entity>,
        filter: &StudentFilter,
    ) -> Select<student::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(student::Column::Id.eq(id.clone()));
        }
        if let Some(ids) = &filter.ids {
            condition = condition.add(student::Column::Id.is_in(ids.clone()));
        }
        if let Some(college_id) = &filter.college_id {
            condition = condition.add(student::Column::CollegeId.eq(college_id.clone()));
        }
        if let Some(email) = &filter.email {
            condition = condition.add(student::Column::Email.eq(email.to_lowercase()));
        }
        if let Some(roll_no) = &filter.roll_no {
            condition = condition.add(student::Column::RollNo.eq(roll_no.to_lowercase()));
        }
        if let Some(department) = &filter.department {
            condition = condition.add(student::Column::Department.eq(department.clone()));
        }
        if let Some(batch_year) = filter.batch_year {
            condition = condition.add(student::Column::BatchYear.eq(batch_year));
        }
        if let Some(batch_years) = &filter.batch_years {
            condition = condition.add(student::Column::BatchYear.is_in(batch_years.clone()));
        }
        if let Some(is_active) = filter.is_active {
            condition = condition.add(student::Column::IsActive.eq(is_active));
        }
        if let Some(query_str) = &filter.query {
            condition = condition.add(
                sea_orm::Condition::any()
                    .add(student::Column::Name.like(format!("%{}%", query_str)))
                    .add(student::Column::Email.like(format!("%{}%", query_str)))
                    .add(student::Column::RollNo.like(format!("%{}%", query_str)))
                    .add(student::Column::Department.like(format!("%{}%", query_str))),
            );
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<student::Entity>,
        sort_by: Option<String>,
    ) -> Select<student::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "name" => {
                    if asc {
                        query.order_by_asc(student::Column::Name)
                    } else {
                        query.order_by_desc(student::Column::Name)
                    }
                }
                "email" => {
                    if asc {
                        query.order_by_asc(student::Column::Email)
                    } else {
                        query.order_by_desc(student::Column::Email)
                    }
                }
                "batch_year" => {
                    if asc {
                        query.order_by_asc(student::Column::BatchYear)
                    } else {
                        query.order_by_desc(student::Column::BatchYear)
                    }
                }
                "created_at" => {
                    if asc {
                        query.order_by_asc(student::Column::CreatedAt)
                    } else {
                        query.order_by_desc(student::Column::CreatedAt)
                    }
                }
                _ => query,
            };
        }
        query
    }
}
