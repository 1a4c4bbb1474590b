use super::patterns::{DATE_DMY, DATE_YMD};
use super::Extracted;
use crate::models::{AnalyzedDocument, DocumentField, NOT_FOUND};
use chrono::{DateTime, NaiveDate};

/// 日期: InvoiceDate 字段 → 全文正则 → 占位, 统一输出 dd.mm.yyyy
///
/// dd/mm/yyyy 与 mm/dd/yyyy 无法区分, 一律按日在前处理.
pub fn extract_date(document: &AnalyzedDocument, content: &str) -> Extracted<String> {
    if let Some(date) = document.field("InvoiceDate").and_then(structured_date) {
        return Extracted::structured(format_date(date));
    }

    match scan_date(content) {
        Some(date) => Extracted::text(date),
        None => Extracted::defaulted(NOT_FOUND.to_string()),
    }
}

/// 解析结构化日期, 兼容 yyyy-mm-dd 与 RFC 3339
fn structured_date(field: &DocumentField) -> Option<NaiveDate> {
    let raw = field
        .value_date
        .as_deref()
        .or(field.value_string.as_deref())?
        .trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// 先整体扫描日在前格式, 再扫描年在前格式
fn scan_date(content: &str) -> Option<String> {
    if let Some(caps) = DATE_DMY.captures(content) {
        return Some(format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]));
    }

    DATE_YMD
        .captures(content)
        .map(|caps| format!("{}.{}.{}", &caps[3], &caps[2], &caps[1]))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FieldSource;
    use serde_json::json;

    fn empty() -> AnalyzedDocument {
        AnalyzedDocument::default()
    }

    #[test]
    fn test_dmy_text() {
        let result = extract_date(&empty(), "Tarih: 10/05/2024");
        assert_eq!(result.value, "10.05.2024");
        assert_eq!(result.source, FieldSource::Text);
    }

    #[test]
    fn test_ymd_text() {
        let result = extract_date(&empty(), "2024-05-10");
        assert_eq!(result.value, "10.05.2024");
    }

    #[test]
    fn test_dmy_preferred_over_earlier_ymd() {
        // 日在前格式先对全文扫描
        let result = extract_date(&empty(), "2023-01-02 ... 15-06-2024");
        assert_eq!(result.value, "15.06.2024");
    }

    #[test]
    fn test_day_first_ambiguity_kept() {
        let result = extract_date(&empty(), "05/10/2024");
        assert_eq!(result.value, "05.10.2024");
    }

    #[test]
    fn test_structured_date() {
        let doc: AnalyzedDocument = serde_json::from_value(json!({
            "fields": { "InvoiceDate": { "type": "date", "valueDate": "2024-03-07", "confidence": 0.8 } }
        }))
        .unwrap();
        let result = extract_date(&doc, "01/01/2000");
        assert_eq!(result.value, "07.03.2024");
        assert_eq!(result.source, FieldSource::Structured);
    }

    #[test]
    fn test_unparseable_structured_date_falls_back() {
        let doc: AnalyzedDocument = serde_json::from_value(json!({
            "fields": { "InvoiceDate": { "type": "date", "valueString": "yarın" } }
        }))
        .unwrap();
        let result = extract_date(&doc, "tarih 11.12.2023");
        assert_eq!(result.value, "11.12.2023");
    }

    #[test]
    fn test_not_found() {
        let result = extract_date(&empty(), "tarih yok");
        assert_eq!(result.value, NOT_FOUND);
        assert_eq!(result.source, FieldSource::Default);
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        let result = extract_date(&empty(), "١٠/٠٥/٢٠٢٤");
        assert_eq!(result.value, NOT_FOUND);
        assert_eq!(result.source, FieldSource::Default);

        let result = extract_date(&empty(), "١٠/٠٥/٢٠٢٤ yerine 11.06.2024");
        assert_eq!(result.value, "11.06.2024");
    }
}
