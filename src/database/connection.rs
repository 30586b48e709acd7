use crate::config::MysqlConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &MysqlConfig) -> AppResult<DbPool> {
    let mut opts = ConnectOptions::new(config.database_url());
    opts.max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let pool = Database::connect(opts).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}
