use super::patterns::INVOICE_NUMBER;
use super::Extracted;
use crate::models::{AnalyzedDocument, NOT_FOUND};

/// 单号: InvoiceId 字段 → 全文正则 → 占位
pub fn extract_invoice_number(document: &AnalyzedDocument, content: &str) -> Extracted<String> {
    if let Some(value) = document.field("InvoiceId").and_then(|f| f.text()) {
        return Extracted::structured(value.to_string());
    }

    match INVOICE_NUMBER.find(content) {
        Some(m) => Extracted::text(m.as_str().to_string()),
        None => Extracted::defaulted(NOT_FOUND.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldSource;
    use serde_json::json;

    fn document(fields: serde_json::Value) -> AnalyzedDocument {
        serde_json::from_value(json!({ "fields": fields })).unwrap()
    }

    #[test]
    fn test_structured_field_wins() {
        let doc = document(json!({
            "InvoiceId": { "type": "string", "valueString": "A-2024-17", "confidence": 0.9 }
        }));
        let result = extract_invoice_number(&doc, "IR-99999");
        assert_eq!(result.value, "A-2024-17");
        assert_eq!(result.source, FieldSource::Structured);
    }

    #[test]
    fn test_regex_fallback() {
        let doc = document(json!({}));
        let result = extract_invoice_number(&doc, "Sevk İrsaliyesi\nNo: IR-12345\nTarih");
        assert_eq!(result.value, "IR-12345");
        assert_eq!(result.source, FieldSource::Text);
    }

    #[test]
    fn test_turkish_prefix() {
        let doc = document(json!({}));
        let result = extract_invoice_number(&doc, "Belge İRS 2024.15 teslim");
        assert_eq!(result.value, "İRS 2024.15");
    }

    #[test]
    fn test_empty_structured_value_falls_back() {
        let doc = document(json!({ "InvoiceId": { "type": "string", "valueString": "" } }));
        let result = extract_invoice_number(&doc, "ir.204");
        assert_eq!(result.value, "ir.204");
    }

    #[test]
    fn test_not_found() {
        let doc = document(json!({}));
        let result = extract_invoice_number(&doc, "no number here");
        assert_eq!(result.value, NOT_FOUND);
        assert!(!result.is_found());
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        let doc = document(json!({}));
        let result = extract_invoice_number(&doc, "IR-١٢٣٤٥");
        assert_eq!(result.value, NOT_FOUND);
    }
}
