use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    PrimaryKeyTrait, QuerySelect, Select,
};

/// Generic repository over a SeaORM entity with a per-entity filter type.
///
/// Implementations supply the connection handle plus filter and sorting
/// mapping; everything else is provided. The handle is injected through the
/// repository struct so there is no ambient connection state.
#[allow(async_fn_in_trait)]
pub trait Repository<E, F>: Send + Sync
where
    E: EntityTrait,
    E::Model: Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    fn db(&self) -> &DatabaseConnection;

    fn apply_filter(query: Select<E>, filter: &F) -> Select<E>;

    /// Sort key convention: column name, `-` prefix for descending.
    fn apply_sorting(query: Select<E>, sort_by: Option<String>) -> Select<E>;

    async fn create(&self, active_model: E::ActiveModel) -> Result<E::Model, DbErr> {
        active_model.insert(self.db()).await
    }

    /// Writes only the `Set` fields of the active model; unset fields keep
    /// their stored values.
    async fn update(&self, active_model: E::ActiveModel) -> Result<E::Model, DbErr> {
        active_model.update(self.db()).await
    }

    async fn delete_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<u64, DbErr> {
        let res = E::delete_by_id(id).exec(self.db()).await?;
        Ok(res.rows_affected)
    }

    /// Absence is `Ok(None)`, never an error.
    async fn find_by_id(
        &self,
        id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
    ) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(self.db()).await
    }

    async fn find_one(
        &self,
        filter: &F,
        sort_by: Option<String>,
    ) -> Result<Option<E::Model>, DbErr> {
        let query = Self::apply_filter(E::find(), filter);
        let query = Self::apply_sorting(query, sort_by);
        query.one(self.db()).await
    }

    async fn find_all(
        &self,
        filter: &F,
        sort_by: Option<String>,
    ) -> Result<Vec<E::Model>, DbErr> {
        let query = Self::apply_filter(E::find(), filter);
        let query = Self::apply_sorting(query, sort_by);
        query.all(self.db()).await
    }

    /// Offset pagination. Rows come back in insertion order when `sort_by`
    /// is `None`; the caller bounds `limit` (1..=1000) before getting here.
    async fn list(
        &self,
        filter: &F,
        sort_by: Option<String>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        let query = Self::apply_filter(E::find(), filter);
        let query = Self::apply_sorting(query, sort_by);
        query.offset(skip).limit(limit).all(self.db()).await
    }

    async fn count(&self, filter: &F) -> Result<u64, DbErr> {
        let query = Self::apply_filter(E::find(), filter);
        <Select<E> as PaginatorTrait<'_, _>>::count(query, self.db()).await
    }

    async fn exists(&self, filter: &F) -> Result<bool, DbErr> {
        Ok(self.count(filter).await? > 0)
    }
}
