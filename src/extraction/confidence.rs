use crate::models::AnalyzedDocument;

/// 没有任何字段置信度时的默认值
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// 所有顶层字段置信度的算术平均, 不加权
pub fn average_confidence(document: &AnalyzedDocument) -> f64 {
    let confidences: Vec<f64> = document
        .fields
        .values()
        .filter_map(|field| field.confidence)
        .filter(|c| c.is_finite())
        .collect();

    if confidences.is_empty() {
        return DEFAULT_CONFIDENCE;
    }

    let sum: f64 = confidences.iter().sum();
    (sum / confidences.len() as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mean_of_present_values() {
        let doc: AnalyzedDocument = serde_json::from_value(json!({
            "fields": {
                "InvoiceId": { "type": "string", "confidence": 0.9 },
                "InvoiceDate": { "type": "date", "confidence": 0.7 },
                "Items": { "type": "array" }
            }
        }))
        .unwrap();

        assert!((average_confidence(&doc) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_default_without_confidences() {
        assert_eq!(average_confidence(&AnalyzedDocument::default()), DEFAULT_CONFIDENCE);

        let doc: AnalyzedDocument = serde_json::from_value(json!({
            "fields": { "InvoiceId": { "type": "string", "valueString": "IR-1" } }
        }))
        .unwrap();
        assert_eq!(average_confidence(&doc), DEFAULT_CONFIDENCE);
    }
}
