use super::store::RecordStore;
use crate::error::Result;
use crate::models::{NewRecord, RecordUpdate, StoredRecord, PLACEHOLDER_IMAGE_URL};
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use tokio::sync::Mutex;

/// 内存存储 (未配置 DATABASE_URL 时使用), 所有修改都在同一把锁下完成
pub struct InMemoryRecordStore {
    inner: Mutex<Inner>,
}

struct Inner {
    /// 按插入顺序保存
    records: IndexMap<i64, StoredRecord>,
    /// 只增不减, 删除后 id 不复用
    next_id: i64,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                records: IndexMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, record: NewRecord) -> Result<StoredRecord> {
        let mut inner = self.inner.lock().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let stored = StoredRecord::new(id, record, PLACEHOLDER_IMAGE_URL, Utc::now());
        inner.records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.records.values().rev().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn update(&self, id: i64, update: RecordUpdate) -> Result<Option<StoredRecord>> {
        let mut inner = self.inner.lock().await;
        let Some(record) = inner.records.get_mut(&id) else {
            return Ok(None);
        };

        update.apply_to(record);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut inner = self.inner.lock().await;
        // shift_remove 保持剩余记录顺序
        Ok(inner.records.shift_remove(&id).is_some())
    }
}
