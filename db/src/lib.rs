pub mod filters;
pub mod models;
pub mod reports;
pub mod repositories;
pub mod test_utils;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Opens the database handle the rest of the system is built around.
///
/// The connection is created once at startup and passed down explicitly;
/// nothing below this function reads connection state from the environment.
pub async fn connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(url).await
}
