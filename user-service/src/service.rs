//! 数据库访问服务模块

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

use common::config::DbConfig;
use common::errors::{AppError, AppResult};
use common::models::{UserRow, SEED_USER_NAME, USERS_TABLE_DDL};

/// 数据库访问服务 Trait
#[async_trait]
pub trait DbServiceTrait: Send + Sync {
    /// 确保 users 表存在，插入一条固定记录并返回全部行
    async fn insert_and_list(&self) -> AppResult<Vec<UserRow>>;

    /// 连接探测，返回数据库服务器版本
    async fn server_version(&self) -> AppResult<String>;
}

/// 数据库访问服务
///
/// 无内部状态；每次调用打开一个独立连接，并在返回前关闭，
/// 不做连接池化，可被并发请求安全调用。
pub struct DbService {
    db: DbConfig,
}

impl DbService {
    /// 创建新的数据库服务实例
    pub fn new(db: DbConfig) -> Self {
        Self { db }
    }

    /// 打开一个新的数据库连接
    async fn connect(&self) -> AppResult<PgConnection> {
        PgConnection::connect(&self.db.connection_url())
            .await
            .map_err(|e| AppError::DatabaseConnection(e.to_string()))
    }

    /// 在已有连接上执行建表、插入、查询的完整序列
    async fn run_insert_and_list(conn: &mut PgConnection) -> AppResult<Vec<UserRow>> {
        // 幂等建表，已存在时不报错、不改动数据
        sqlx::query(USERS_TABLE_DDL)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;

        // 在事务中插入并提交，保证随后的查询能看到这条记录
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;

        let (id,): (i32,) =
            sqlx::query_as("INSERT INTO users (name) VALUES ($1) RETURNING id")
                .bind(SEED_USER_NAME)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;

        tracing::info!(id, name = SEED_USER_NAME, "记录已插入");

        // 返回全部行，不指定排序
        sqlx::query_as::<_, UserRow>("SELECT id, name FROM users")
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))
    }
}

#[async_trait]
impl DbServiceTrait for DbService {
    async fn insert_and_list(&self) -> AppResult<Vec<UserRow>> {
        let mut conn = self.connect().await?;
        let result = Self::run_insert_and_list(&mut conn).await;
        // 成功失败都在返回前关闭连接
        let _ = conn.close().await;
        result
    }

    async fn server_version(&self) -> AppResult<String> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_scalar::<_, String>("SELECT version()")
            .fetch_one(&mut conn)
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()));
        let _ = conn.close().await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Config for the live-database tests, from TEST_POSTGRES_* variables.
    fn live_config() -> DbConfig {
        DbConfig {
            host: std::env::var("TEST_POSTGRES_HOST").unwrap_or_else(|_| "localhost".into()),
            database: std::env::var("TEST_POSTGRES_DB").unwrap_or_else(|_| "postgres".into()),
            username: std::env::var("TEST_POSTGRES_USER").unwrap_or_else(|_| "postgres".into()),
            password: std::env::var("TEST_POSTGRES_PASSWORD").unwrap_or_default(),
        }
    }

    fn bad_config() -> DbConfig {
        DbConfig {
            host: "127.0.0.1".into(),
            database: "no_such_database".into(),
            username: "no_such_user".into(),
            password: "wrong".into(),
        }
    }

    #[tokio::test]
    async fn server_version_fails_without_reachable_database() {
        let service = DbService::new(bad_config());
        assert!(service.server_version().await.is_err());
    }

    #[tokio::test]
    async fn insert_and_list_fails_without_reachable_database() {
        let service = DbService::new(bad_config());
        assert!(service.insert_and_list().await.is_err());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL server (TEST_POSTGRES_*)"]
    async fn insert_and_list_appends_one_row_per_call() {
        let service = DbService::new(live_config());

        let before = service.insert_and_list().await.unwrap();
        let after = service.insert_and_list().await.unwrap();

        assert_eq!(after.len(), before.len() + 1);

        // 新插入的行 id 大于之前所有行，且名字固定
        let max_before = before.iter().map(|(id, _)| *id).max().unwrap_or(0);
        let newest = after.iter().max_by_key(|(id, _)| *id).unwrap();
        assert!(newest.0 > max_before);
        assert_eq!(newest.1, SEED_USER_NAME);
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL server (TEST_POSTGRES_*)"]
    async fn table_bootstrap_is_idempotent() {
        let service = DbService::new(live_config());

        // 连续两次调用都会执行 CREATE TABLE IF NOT EXISTS，
        // 第二次不应报错，也不应丢数据
        let first = service.insert_and_list().await.unwrap();
        let second = service.insert_and_list().await.unwrap();
        assert!(second.len() > first.len());
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL server (TEST_POSTGRES_*)"]
    async fn server_version_returns_nonempty_string() {
        let service = DbService::new(live_config());
        let version = service.server_version().await.unwrap();
        assert!(!version.is_empty());
    }
}
