use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// 比較兩個儲存格值。缺值視同空字串，絕不排除於輸出之外。
/// 兩側都能解析為數字時用數值比較，否則退回字典序。
/// 升冪與降冪共用同一個比較器（降冪只是交換參數），
/// 相等時回傳 Ordering::Equal，讓穩定排序保留原相對順序。
pub fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a_text = cell_text(a);
    let b_text = cell_text(b);

    match (a_text.trim().parse::<f64>(), b_text.trim().parse::<f64>()) {
        (Ok(a_num), Ok(b_num)) => a_num.total_cmp(&b_num),
        _ => a_text.cmp(&b_text),
    }
}

/// 取出儲存格的字串形式；非字串值沿用 JSON 字面值（去掉外層引號）。
fn cell_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string().trim_matches('"').to_string()),
    }
}
