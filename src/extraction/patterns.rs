//! 兜底提取使用的正则

use lazy_static::lazy_static;
use regex::Regex;

// 数字只认 ASCII 0-9, regex 的 \d 会匹配任意 Unicode 数字
lazy_static! {
    // 单号: IR-12345 / İRS.2024-001
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(IR|İRS)\s*[-.]?\s*[0-9]+[-.]?[0-9]*"
    ).unwrap();

    // dd/mm/yyyy, dd-mm-yyyy, dd.mm.yyyy
    pub static ref DATE_DMY: Regex = Regex::new(
        r"([0-9]{2})[/\-.]([0-9]{2})[/\-.]([0-9]{4})"
    ).unwrap();

    // yyyy-mm-dd
    pub static ref DATE_YMD: Regex = Regex::new(
        r"([0-9]{4})[/\-.]([0-9]{2})[/\-.]([0-9]{2})"
    ).unwrap();

    // <商品名> <数量> <单位>
    pub static ref PRODUCT_LINE: Regex = Regex::new(
        r"(?i)([A-Za-zÇçĞğİıÖöŞşÜü\s]+)\s+([0-9]+(?:[.,][0-9]+)?)\s*(adet|kg|ton|pcs)"
    ).unwrap();
}
