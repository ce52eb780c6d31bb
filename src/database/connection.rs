use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

use super::migrations::Migrator;

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_string());

    if database_url.contains(":memory:") {
        // Every pooled connection would open its own empty in-memory database
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(10)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(3600));
    }

    opt.connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(true)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Database::connect(opt).await
}

pub fn get_database_url(database_path: Option<&str>) -> String {
    match database_path {
        Some(":memory:") => "sqlite::memory:".to_string(),
        Some(path) => format!("sqlite://{}?mode=rwc", path),
        None => "sqlite://dishboard.db?mode=rwc".to_string(),
    }
}

/// Bring a freshly opened database up to the latest schema.
pub async fn setup_database(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    info!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_for_memory() {
        assert_eq!(get_database_url(Some(":memory:")), "sqlite::memory:");
    }

    #[test]
    fn test_database_url_for_file() {
        assert_eq!(
            get_database_url(Some("data/directory.db")),
            "sqlite://data/directory.db?mode=rwc"
        );
        assert_eq!(get_database_url(None), "sqlite://dishboard.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_setup_in_memory_database() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        setup_database(&db).await.unwrap();
        // Running twice is a no-op
        setup_database(&db).await.unwrap();
    }
}
