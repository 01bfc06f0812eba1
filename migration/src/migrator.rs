use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202606010001_create_users::Migration),
            Box::new(migrations::m202606010002_create_colleges::Migration),
            Box::new(migrations::m202606010003_create_students::Migration),
            Box::new(migrations::m202606010004_create_events::Migration),
            Box::new(migrations::m202606010005_create_registrations::Migration),
            Box::new(migrations::m202606010006_create_attendance::Migration),
            Box::new(migrations::m202606010007_create_feedback::Migration),
        ]
    }
}
