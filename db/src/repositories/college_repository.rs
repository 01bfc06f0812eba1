use crate::filters::CollegeFilter;
use crate::models::college;
use crate::repositories::repository::Repository;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select};

#[derive(Clone)]
pub struct CollegeRepository {
    db: DatabaseConnection,
}

impl CollegeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Exact domain match; domains are stored lowercase so lowercasing the
    /// argument makes the lookup case-insensitive.
    pub async fn find_by_domain(&self, domain: &str) -> Result<Option<college::Model>, DbErr> {
        college::Entity::find()
            .filter(college::Column::Domain.eq(domain.to_lowercase()))
            .one(&self.db)
            .await
    }
}

impl Repository<college::Entity, CollegeFilter> for CollegeRepository {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn apply_filter(
        query: Select<college::Entity>,
        filter: &CollegeFilter,
    ) -> Select<college::Entity> {
        let mut condition = sea_orm::Condition::all();
        if let Some(id) = &filter.id {
            condition = condition.add(college::Column::Id.eq(id.clone()));
        }
        if let Some(ids) = &filter.ids {
            condition = condition.add(college::Column::Id.is_in(ids.clone()));
        }
        if let Some(name) = &filter.name {
            condition = condition.add(college::Column::Name.eq(name.clone()));
        }
        if let Some(domain) = &filter.domain {
            condition = condition.add(college::Column::Domain.eq(domain.to_lowercase()));
        }
        if let Some(is_active) = filter.is_active {
            condition = condition.add(college::Column::IsActive.eq(is_active));
        }
        if let Some(query_str) = &filter.query {
            condition = condition.add(
                sea_orm::Condition::any()
                    .add(college::Column::Name.like(format!("%{}%", query_str)))
                    .add(college::Column::Domain.like(format!("%{}%", query_str)))
                    .add(college::Column::Address.like(format!("%{}%", query_str))),
            );
        }
        query.filter(condition)
    }

    fn apply_sorting(
        mut query: Select<college::Entity>,
        sort_by: Option<String>,
    ) -> Select<college::Entity> {
        if let Some(sort) = sort_by {
            let (column, asc) = if let Some(rest) = sort.strip_prefix('-') {
                (rest, false)
            } else {
                (sort.as_str(), true)
            };

            query = match column {
                "name" => {
                    if asc {
                        query.order_by_asc(college::Column::Name)
                    } else {
                        query.order_by_desc(college::Column::Name)
                    }
                }
                "domain" => {
                    if asc {
                        query.order_by_asc(college::Column::Domain)
                    } else {
                        query.order_by_desc(college::Column::Domain)
                    }
                }
                "created_at" => {
                    if asc {
                        query.order_by_asc(college::Column::CreatedAt)
                    } else {
                        query.order_by_desc(college::Column::CreatedAt)
                    }
                }
                _ => query,
            };
        }
        query
    }
}
