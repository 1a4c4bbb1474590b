use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未识别字段的占位值
pub const NOT_FOUND: &str = "Bulunamadı";

/// 图片地址占位 (暂不保存原图)
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder-image.jpg";

/// 计量单位, 反序列化时任意文本都会先经过单位归一化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Unit {
    #[default]
    Adet,
    Kg,
    Ton,
    Pcs,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Adet => "adet",
            Unit::Kg => "kg",
            Unit::Ton => "ton",
            Unit::Pcs => "pcs",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Unit {
    fn from(text: &str) -> Self {
        crate::extraction::normalize_unit(text)
    }
}

impl From<String> for Unit {
    fn from(text: String) -> Self {
        Unit::from(text.as_str())
    }
}

/// 识别结果 (上传后返回给用户审核, 不直接入库)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    pub invoice_number: String,
    pub date: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub confidence: f64,
}

impl ExtractedRecord {
    /// 校验数量与置信度范围
    pub fn validate(&self) -> Result<(), AppError> {
        validate_quantity(self.quantity)?;
        validate_confidence(self.confidence)
    }
}

/// 保存请求体即审核后的识别结果
pub type NewRecord = ExtractedRecord;

/// 已保存的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: i64,
    pub invoice_number: String,
    pub date: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub confidence: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl StoredRecord {
    pub fn new(id: i64, record: NewRecord, image_url: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            invoice_number: record.invoice_number,
            date: record.date,
            product_name: record.product_name,
            quantity: record.quantity,
            unit: record.unit,
            confidence: record.confidence,
            image_url: image_url.to_string(),
            created_at,
        }
    }

    /// 去掉 id / createdAt / imageUrl 后的字段
    pub fn to_extracted(&self) -> ExtractedRecord {
        ExtractedRecord {
            invoice_number: self.invoice_number.clone(),
            date: self.date.clone(),
            product_name: self.product_name.clone(),
            quantity: self.quantity,
            unit: self.unit,
            confidence: self.confidence,
        }
    }
}

/// 更新请求体: 只应用出现的字段, id 与 createdAt 忽略
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    pub invoice_number: Option<String>,
    pub date: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<Unit>,
    pub confidence: Option<f64>,
    pub image_url: Option<String>,
}

impl RecordUpdate {
    pub fn is_empty(&self) -> bool {
        self.invoice_number.is_none()
            && self.date.is_none()
            && self.product_name.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.confidence.is_none()
            && self.image_url.is_none()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(quantity) = self.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(confidence) = self.confidence {
            validate_confidence(confidence)?;
        }
        Ok(())
    }

    /// 合并到已有记录 (后写覆盖)
    pub fn apply_to(&self, record: &mut StoredRecord) {
        if let Some(v) = &self.invoice_number {
            record.invoice_number = v.clone();
        }
        if let Some(v) = &self.date {
            record.date = v.clone();
        }
        if let Some(v) = &self.product_name {
            record.product_name = v.clone();
        }
        if let Some(v) = self.quantity {
            record.quantity = v;
        }
        if let Some(v) = self.unit {
            record.unit = v;
        }
        if let Some(v) = self.confidence {
            record.confidence = v;
        }
        if let Some(v) = &self.image_url {
            record.image_url = v.clone();
        }
    }
}

fn validate_quantity(quantity: f64) -> Result<(), AppError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(AppError::InvalidRecord {
            message: format!("quantity must be a non-negative number, got {}", quantity),
        });
    }
    Ok(())
}

fn validate_confidence(confidence: f64) -> Result<(), AppError> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(AppError::InvalidRecord {
            message: format!("confidence must be within [0, 1], got {}", confidence),
        });
    }
    Ok(())
}
