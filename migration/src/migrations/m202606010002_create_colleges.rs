use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202606010002_create_colleges"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("colleges"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).string_len(50).not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    // stored lowercase so the plain unique index is case-insensitive
                    .col(ColumnDef::new(Alias::new("domain")).string().null().unique_key())
                    .col(ColumnDef::new(Alias::new("address")).text().null())
                    .col(ColumnDef::new(Alias::new("contact_email")).string().null())
                    .col(ColumnDef::new(Alias::new("contact_phone")).string_len(20).null())
                    .col(ColumnDef::new(Alias::new("logo_url")).string().null())
                    .col(ColumnDef::new(Alias::new("is_active")).boolean().not_null().default(true))
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("colleges")).to_owned())
            .await
    }
}
