pub mod export;
pub mod memory;
pub mod pool;
pub mod postgres;
pub mod store;

pub use export::{export_to_bytes, export_to_csv, CSV_FILENAME};
pub use memory::InMemoryRecordStore;
pub use pool::create_pool;
pub use postgres::PgRecordStore;
pub use store::RecordStore;

use crate::config::DatabaseConfig;
use crate::error::Result;
use std::sync::Arc;

/// 根据配置选择存储: 配置了 DATABASE_URL 用 PostgreSQL, 否则用内存
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>> {
    match config.url.as_deref() {
        Some(url) => {
            let pool = create_pool(url, config).await?;
            let store = PgRecordStore::new(pool);
            store.migrate().await?;
            tracing::info!("Using PostgreSQL record store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, records are kept in memory only");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}
