use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202606010003_create_students"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("students"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).string_len(50).not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("college_id")).string_len(50).not_null())
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("email")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("roll_no")).string_len(50).null())
                    .col(ColumnDef::new(Alias::new("phone")).string_len(20).null())
                    .col(ColumnDef::new(Alias::new("department")).string_len(50).null())
                    .col(ColumnDef::new(Alias::new("batch_year")).integer().null())
                    .col(ColumnDef::new(Alias::new("is_active")).boolean().not_null().default(true))
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("students"), Alias::new("college_id"))
                            .to(Alias::new("colleges"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // roll numbers are unique per college, not globally
        manager
            .create_index(
                Index::create()
                    .name("uq_students_college_roll_no")
                    .table(Alias::new("students"))
                    .col(Alias::new("college_id"))
                    .col(Alias::new("roll_no"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("students")).to_owned())
            .await
    }
}
