use crate::config::DatabaseConfig;
use crate::error::AppResult;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_pool(config: &DatabaseConfig) -> AppResult<DbPool> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let pool = Database::connect(options).await?;

    Ok(pool)
}

/// 启动时执行增量迁移（已存在的列会被跳过）
pub async fn run_migrations(pool: &DbPool) -> AppResult<()> {
    Migrator::up(pool, None).await?;
    Ok(())
}

/// 单连接内存库，测试用
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let pool = create_pool(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::SchemaManager;

    #[tokio::test]
    async fn test_migrations_are_rerunnable() {
        let pool = test_pool().await;
        // 二次执行不应报错（列检查 + IF NOT EXISTS）
        run_migrations(&pool).await.unwrap();

        let manager = SchemaManager::new(&pool);
        for column in ["qr_token", "is_verified", "verified_at", "activities", "dob"] {
            assert!(manager.has_column("orders", column).await.unwrap(), "{column}");
        }
        assert!(manager.has_table("contact_messages").await.unwrap());
        assert!(manager.has_table("admin_users").await.unwrap());
    }
}
