use super::analysis::DocumentAnalyzer;
use crate::error::{AppError, Result};
use crate::extraction::{
    average_confidence, extract_date, extract_invoice_number, extract_product, FieldSource,
};
use crate::models::{AnalyzedDocument, ExtractedRecord};
use serde::Serialize;
use std::sync::Arc;

/// 各字段的取值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSources {
    pub invoice_number: FieldSource,
    pub date: FieldSource,
    pub product: FieldSource,
}

/// 一次上传的识别结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    #[serde(flatten)]
    pub record: ExtractedRecord,
    pub sources: FieldSources,
}

/// 识别流程: 调用分析服务, 再逐字段提取
pub struct ReceiptExtractor {
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl ReceiptExtractor {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// 只在分析服务未配置/出错或没有识别出文档时失败
    pub async fn extract(&self, image: Vec<u8>, content_type: &str) -> Result<Extraction> {
        let result = self.analyzer.analyze(image, content_type).await?;
        let document = result.primary_document().ok_or(AppError::NoDocuments)?;

        let extraction = extract_fields(document, &result.content);
        tracing::info!(
            "Extracted {}: sources={:?}, confidence={:.2}",
            extraction.record.invoice_number,
            extraction.sources,
            extraction.record.confidence
        );
        Ok(extraction)
    }
}

/// 逐字段提取, 不会失败
pub fn extract_fields(document: &AnalyzedDocument, content: &str) -> Extraction {
    let invoice_number = extract_invoice_number(document, content);
    let date = extract_date(document, content);
    let product = extract_product(document, content);
    let confidence = average_confidence(document);

    let sources = FieldSources {
        invoice_number: invoice_number.source,
        date: date.source,
        product: product.source,
    };
    let product = product.into_value();

    Extraction {
        record: ExtractedRecord {
            invoice_number: invoice_number.into_value(),
            date: date.into_value(),
            product_name: product.product_name,
            quantity: product.quantity,
            unit: product.unit,
            confidence,
        },
        sources,
    }
}
