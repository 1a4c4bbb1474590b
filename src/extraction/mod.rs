//! 字段提取: 优先使用分析服务的结构化字段, 缺失时对全文做正则兜底, 再不行给占位值.
//!
//! 每个提取器都不会失败, 但会通过 [`FieldSource`] 标明取值来源.

pub mod confidence;
pub mod date;
pub mod invoice_number;
pub mod patterns;
pub mod product;
pub mod unit;

pub use confidence::{average_confidence, DEFAULT_CONFIDENCE};
pub use date::extract_date;
pub use invoice_number::extract_invoice_number;
pub use product::{extract_product, ProductInfo};
pub use unit::normalize_unit;

use serde::{Deserialize, Serialize};

/// 字段取值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// 分析服务识别的结构化字段
    Structured,
    /// 全文正则兜底
    Text,
    /// 占位默认值
    Default,
}

/// 提取结果: 值 + 来源
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted<T> {
    pub value: T,
    pub source: FieldSource,
}

impl<T> Extracted<T> {
    pub fn structured(value: T) -> Self {
        Self {
            value,
            source: FieldSource::Structured,
        }
    }

    pub fn text(value: T) -> Self {
        Self {
            value,
            source: FieldSource::Text,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            source: FieldSource::Default,
        }
    }

    pub fn is_found(&self) -> bool {
        self.source != FieldSource::Default
    }

    pub fn into_value(self) -> T {
        self.value
    }
}
