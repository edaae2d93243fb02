use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{course, student};

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .sqlx_logging(config.sqlx_logging);
    if config.idle_timeout_secs > 0 {
        opt.idle_timeout(Duration::from_secs(config.idle_timeout_secs));
    }

    let db = Database::connect(opt).await?;
    db.get_schema_registry("registrar_server::entity::*")
        .sync(&db)
        .await?;
    ensure_indexes(&db).await?;

    Ok(db)
}

/// Create secondary indexes on foreign-key and listing sort columns.
///
/// Schema sync only creates the tables and their key constraints, so the
/// plain lookup indexes are created here on every start.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        (
            "idx_course_resp_college",
            Index::create()
                .if_not_exists()
                .name("idx_course_resp_college")
                .table(course::Entity)
                .col(course::Column::RespCollege)
                .to_owned(),
        ),
        (
            "idx_student_course",
            Index::create()
                .if_not_exists()
                .name("idx_student_course")
                .table(student::Entity)
                .col(student::Column::Course)
                .to_owned(),
        ),
        (
            "idx_student_last_name",
            Index::create()
                .if_not_exists()
                .name("idx_student_last_name")
                .table(student::Entity)
                .col(student::Column::LastName)
                .to_owned(),
        ),
    ];

    let backend = db.get_database_backend();
    for (name, stmt) in &indexes {
        match db.execute_raw(backend.build(stmt)).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
