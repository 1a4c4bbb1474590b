use crate::error::Result;
use crate::models::{NewRecord, RecordUpdate, StoredRecord};
use async_trait::async_trait;

/// 记录存储: 内存 / PostgreSQL 两种实现, 启动时选定
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 后端名称, 用于日志
    fn backend(&self) -> &'static str;

    async fn create(&self, record: NewRecord) -> Result<StoredRecord>;

    /// 按创建时间倒序
    async fn list(&self) -> Result<Vec<StoredRecord>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>>;

    /// 记录不存在时返回 None, 不做任何修改
    async fn update(&self, id: i64, update: RecordUpdate) -> Result<Option<StoredRecord>>;

    async fn delete(&self, id: i64) -> Result<bool>;
}
