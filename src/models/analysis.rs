use serde::Deserialize;
use std::collections::HashMap;

/// 文档分析服务返回的 analyzeResult
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    /// 识别出的全文
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub documents: Vec<AnalyzedDocument>,
}

impl AnalyzeResult {
    /// 只取第一个文档
    pub fn primary_document(&self) -> Option<&AnalyzedDocument> {
        self.documents.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedDocument {
    pub doc_type: Option<String>,
    #[serde(default)]
    pub fields: HashMap<String, DocumentField>,
    pub confidence: Option<f64>,
}

impl AnalyzedDocument {
    pub fn field(&self, name: &str) -> Option<&DocumentField> {
        self.fields.get(name)
    }
}

/// 结构化字段 (InvoiceId / InvoiceDate / Items ...)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentField {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value_string: Option<String>,
    pub value_date: Option<String>,
    pub value_number: Option<f64>,
    #[serde(default)]
    pub value_array: Vec<DocumentField>,
    #[serde(default)]
    pub value_object: HashMap<String, DocumentField>,
    pub content: Option<String>,
    pub confidence: Option<f64>,
}

impl DocumentField {
    /// 文本值: 优先 valueString, 其次 content, 空串视为缺失
    pub fn text(&self) -> Option<&str> {
        self.value_string
            .as_deref()
            .or(self.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// 数值: 优先 valueNumber, 其次尝试解析 content
    pub fn number(&self) -> Option<f64> {
        self.value_number.or_else(|| {
            self.content
                .as_deref()
                .and_then(|c| c.trim().replace(',', ".").parse().ok())
        })
    }

    pub fn property(&self, name: &str) -> Option<&DocumentField> {
        self.value_object.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_invoice_document() {
        let result: AnalyzeResult = serde_json::from_value(json!({
            "content": "IRSALIYE\nIR-77",
            "documents": [{
                "docType": "invoice",
                "fields": {
                    "InvoiceId": { "type": "string", "valueString": "IR-77", "confidence": 0.93 },
                    "Items": {
                        "type": "array",
                        "valueArray": [{
                            "type": "object",
                            "valueObject": {
                                "Description": { "type": "string", "valueString": "Demir", "content": "Demir" },
                                "Quantity": { "type": "number", "valueNumber": 4.0 }
                            }
                        }]
                    }
                }
            }]
        }))
        .unwrap();

        let doc = result.primary_document().unwrap();
        assert_eq!(doc.field("InvoiceId").and_then(|f| f.text()), Some("IR-77"));
        let item = &doc.field("Items").unwrap().value_array[0];
        assert_eq!(item.property("Quantity").and_then(|f| f.number()), Some(4.0));
        assert_eq!(result.content, "IRSALIYE\nIR-77");
    }

    #[test]
    fn test_blank_text_is_missing() {
        let field = DocumentField {
            value_string: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(field.text(), None);
    }

    #[test]
    fn test_number_falls_back_to_content() {
        let field = DocumentField {
            content: Some("2,5".into()),
            ..Default::default()
        };
        assert_eq!(field.number(), Some(2.5));
    }
}
