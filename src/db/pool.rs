use crate::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// 按配置建立连接池
///
/// 每个请求最多占用一个连接, 连接数不需要很大.
pub async fn create_pool(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let connect_options = PgConnectOptions::from_str(url)?.log_slow_statements(
        tracing::log::LevelFilter::Warn,
        config.slow_statement_threshold(),
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(connect_options)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        "PostgreSQL pool connected"
    );
    Ok(pool)
}
