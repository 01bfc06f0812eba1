use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202606010006_create_attendance"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).string_len(50).not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("event_id")).string_len(50).not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).string_len(50).not_null())
                    .col(ColumnDef::new(Alias::new("present")).boolean().not_null().default(false))
                    .col(ColumnDef::new(Alias::new("check_in_time")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("check_out_time")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("method")).string_len(50).null())
                    .col(ColumnDef::new(Alias::new("verified_by")).string().null())
                    .col(ColumnDef::new(Alias::new("notes")).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("attendance"), Alias::new("event_id"))
                            .to(Alias::new("events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("attendance"), Alias::new("student_id"))
                            .to(Alias::new("students"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // re-marking updates the row for the pair instead of adding another
        manager
            .create_index(
                Index::create()
                    .name("uq_attendance_event_student")
                    .table(Alias::new("attendance"))
                    .col(Alias::new("event_id"))
                    .col(Alias::new("student_id"))
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("attendance")).to_owned())
            .await
    }
}
