use super::patterns::PRODUCT_LINE;
use super::{normalize_unit, Extracted};
use crate::models::{AnalyzedDocument, DocumentField, Unit, NOT_FOUND};

/// 商品名 / 数量 / 单位
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInfo {
    pub product_name: String,
    pub quantity: f64,
    pub unit: Unit,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            product_name: NOT_FOUND.to_string(),
            quantity: 1.0,
            unit: Unit::Adet,
        }
    }
}

/// 商品信息: Items 第一行 → 全文正则 → 占位
pub fn extract_product(document: &AnalyzedDocument, content: &str) -> Extracted<ProductInfo> {
    if let Some(item) = document
        .field("Items")
        .and_then(|items| items.value_array.first())
    {
        return Extracted::structured(from_line_item(item));
    }

    match scan_product(content) {
        Some(info) => Extracted::text(info),
        None => Extracted::defaulted(ProductInfo::default()),
    }
}

fn from_line_item(item: &DocumentField) -> ProductInfo {
    let product_name = item
        .property("Description")
        .and_then(|f| f.text())
        .unwrap_or(NOT_FOUND)
        .to_string();

    let quantity = item
        .property("Quantity")
        .and_then(|f| f.number())
        .filter(|q| q.is_finite() && *q >= 0.0)
        .unwrap_or(1.0);

    let unit = item
        .property("Unit")
        .and_then(|f| f.text())
        .map(normalize_unit)
        .unwrap_or_default();

    ProductInfo {
        product_name,
        quantity,
        unit,
    }
}

fn scan_product(content: &str) -> Option<ProductInfo> {
    let caps = PRODUCT_LINE.captures(content)?;
    let quantity: f64 = caps[2].replace(',', ".").parse().ok()?;

    Some(ProductInfo {
        product_name: caps[1].trim().to_string(),
        quantity,
        unit: normalize_unit(&caps[3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document(fields: serde_json::Value) -> AnalyzedDocument {
        serde_json::from_value(json!({ "fields": fields })).unwrap()
    }

    #[test]
    fn test_first_line_item() {
        let doc = document(json!({
            "Items": {
                "type": "array",
                "valueArray": [
                    {
                        "type": "object",
                        "valueObject": {
                            "Description": { "type": "string", "valueString": "Portland Çimento" },
                            "Quantity": { "type": "number", "valueNumber": 40 },
                            "Unit": { "type": "string", "valueString": "KG" }
                        }
                    },
                    {
                        "type": "object",
                        "valueObject": {
                            "Description": { "type": "string", "valueString": "Kum" }
                        }
                    }
                ]
            }
        }));

        let result = extract_product(&doc, "");
        assert_eq!(result.source, FieldSource::Structured);
        assert_eq!(
            result.value,
            ProductInfo {
                product_name: "Portland Çimento".into(),
                quantity: 40.0,
                unit: Unit::Kg,
            }
        );
    }

    #[test]
    fn test_line_item_defaults() {
        let doc = document(json!({
            "Items": { "type": "array", "valueArray": [{ "type": "object", "valueObject": {} }] }
        }));

        let result = extract_product(&doc, "Tuğla 500 adet");
        assert_eq!(result.source, FieldSource::Structured);
        assert_eq!(result.value, ProductInfo::default());
    }

    #[test]
    fn test_text_fallback_with_decimal_comma() {
        let doc = document(json!({ "Items": { "type": "array", "valueArray": [] } }));

        let result = extract_product(&doc, "Ürün\nDemir Çubuk 12,5 kg\n");
        assert_eq!(result.source, FieldSource::Text);
        assert_eq!(result.value.quantity, 12.5);
        assert_eq!(result.value.unit, Unit::Kg);
        assert!(result.value.product_name.ends_with("Demir Çubuk"));
    }

    #[test]
    fn test_text_fallback_unit_case_insensitive() {
        let result = extract_product(&AnalyzedDocument::default(), "Tuğla 500 ADET");
        assert_eq!(result.value.product_name, "Tuğla");
        assert_eq!(result.value.quantity, 500.0);
        assert_eq!(result.value.unit, Unit::Adet);
    }

    #[test]
    fn test_non_ascii_digits_are_not_quantities() {
        let result = extract_product(&AnalyzedDocument::default(), "Kum ٧ kg");
        assert_eq!(result.source, FieldSource::Default);
        assert_eq!(result.value, ProductInfo::default());
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        let result = extract_product(&AnalyzedDocument::default(), "12345");
        assert_eq!(result.source, FieldSource::Default);
        assert_eq!(result.value, ProductInfo::default());
    }
}
