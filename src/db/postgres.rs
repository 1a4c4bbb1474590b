use super::store::RecordStore;
use crate::error::Result;
use crate::models::{NewRecord, RecordUpdate, StoredRecord, Unit, PLACEHOLDER_IMAGE_URL};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// receipts 表的一行
#[derive(Debug, Clone, FromRow)]
struct ReceiptRow {
    id: i64,
    invoice_number: String,
    date: String,
    product_name: String,
    quantity: BigDecimal,
    unit: String,
    confidence: BigDecimal,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ReceiptRow> for StoredRecord {
    fn from(row: ReceiptRow) -> Self {
        Self {
            id: row.id,
            invoice_number: row.invoice_number,
            date: row.date,
            product_name: row.product_name,
            quantity: from_decimal(&row.quantity),
            unit: Unit::from(row.unit.as_str()),
            confidence: from_decimal(&row.confidence),
            image_url: row.image_url.unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

/// 按 f64 的最短十进制表示入库, 读回时得到同一个值
fn to_decimal(value: f64) -> BigDecimal {
    BigDecimal::from_str(&value.to_string()).unwrap_or_default()
}

fn from_decimal(value: &BigDecimal) -> f64 {
    value.to_string().parse().unwrap_or_default()
}

/// PostgreSQL 存储
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 建表 (已存在则跳过)
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS receipts (
                id BIGSERIAL PRIMARY KEY,
                invoice_number VARCHAR(255) NOT NULL,
                date VARCHAR(50) NOT NULL,
                product_name VARCHAR(255) NOT NULL,
                quantity NUMERIC NOT NULL,
                unit VARCHAR(50) NOT NULL,
                confidence NUMERIC NOT NULL,
                image_url TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // 旧表的 NUMERIC(p, s) 会截断小数
        sqlx::query(
            "ALTER TABLE receipts ALTER COLUMN quantity TYPE NUMERIC, ALTER COLUMN confidence TYPE NUMERIC",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("receipts table ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, record: NewRecord) -> Result<StoredRecord> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            INSERT INTO receipts (invoice_number, date, product_name, quantity, unit, confidence, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING id, invoice_number, date, product_name, quantity, unit, confidence, image_url, created_at
            "#,
        )
        .bind(&record.invoice_number)
        .bind(&record.date)
        .bind(&record.product_name)
        .bind(to_decimal(record.quantity))
        .bind(record.unit.as_str())
        .bind(to_decimal(record.confidence))
        .bind(PLACEHOLDER_IMAGE_URL)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list(&self) -> Result<Vec<StoredRecord>> {
        let rows = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, invoice_number, date, product_name, quantity, unit, confidence, image_url, created_at
            FROM receipts
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredRecord::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<StoredRecord>> {
        let row = sqlx::query_as::<_, ReceiptRow>(
            r#"
            SELECT id, invoice_number, date, product_name, quantity, unit, confidence, image_url, created_at
            FROM receipts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredRecord::from))
    }

    async fn update(&self, id: i64, update: RecordUpdate) -> Result<Option<StoredRecord>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        // 只更新出现的字段, 其余保持原值
        let mut builder = sqlx::QueryBuilder::new("UPDATE receipts SET ");
        let mut fields = builder.separated(", ");

        if let Some(v) = update.invoice_number {
            fields.push("invoice_number = ").push_bind_unseparated(v);
        }
        if let Some(v) = update.date {
            fields.push("date = ").push_bind_unseparated(v);
        }
        if let Some(v) = update.product_name {
            fields.push("product_name = ").push_bind_unseparated(v);
        }
        if let Some(v) = update.quantity {
            fields.push("quantity = ").push_bind_unseparated(to_decimal(v));
        }
        if let Some(v) = update.unit {
            fields.push("unit = ").push_bind_unseparated(v.as_str());
        }
        if let Some(v) = update.confidence {
            fields.push("confidence = ").push_bind_unseparated(to_decimal(v));
        }
        if let Some(v) = update.image_url {
            fields.push("image_url = ").push_bind_unseparated(v);
        }

        builder.push(" WHERE id = ").push_bind(id);
        builder.push(
            " RETURNING id, invoice_number, date, product_name, quantity, unit, confidence, image_url, created_at",
        );

        let row = builder
            .build_query_as::<ReceiptRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(StoredRecord::from))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
