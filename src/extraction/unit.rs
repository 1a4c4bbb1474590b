use crate::models::Unit;

/// 单位归一化: 不区分大小写的子串匹配, 按 kg → ton → pcs/piece 的顺序, 默认 adet
pub fn normalize_unit(text: &str) -> Unit {
    let unit = text.to_lowercase();

    if unit.contains("kg") {
        Unit::Kg
    } else if unit.contains("ton") {
        Unit::Ton
    } else if unit.contains("pcs") || unit.contains("piece") {
        Unit::Pcs
    } else {
        Unit::Adet
    }
}
