use crate::error::Result;
use crate::models::StoredRecord;
use csv::{QuoteStyle, WriterBuilder};
use std::io::Write;

/// 导出文件名
pub const CSV_FILENAME: &str = "irsaliye_kayitlari.csv";

const HEADERS: [&str; 6] = ["İrsaliye No", "Tarih", "Ürün Adı", "Adet", "Birim", "Güven"];

/// 文本列加双引号 (内部引号转义为两个)
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// 两位小数, .5 向远离零的方向进位 (0.625 → 0.63)
fn format_confidence(confidence: f64) -> String {
    format!("{:.2}", (confidence * 100.0).round() / 100.0)
}

/// 导出记录到 CSV: 表头不加引号, 文本列加引号, 数量与置信度 (两位小数) 不加引号
pub fn export_to_csv<W: Write>(records: &[StoredRecord], output: W) -> Result<()> {
    // 引号由 quoted() 处理, writer 原样输出
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(output);

    writer.write_record(HEADERS)?;

    for record in records {
        writer.write_record(&[
            quoted(&record.invoice_number),
            quoted(&record.date),
            quoted(&record.product_name),
            record.quantity.to_string(),
            quoted(record.unit.as_str()),
            format_confidence(record.confidence),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出到内存
pub fn export_to_bytes(records: &[StoredRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    export_to_csv(records, &mut buffer)?;
    Ok(buffer)
}
