use crate::domain::model::{NormalizedResult, RawPayload, Record};
use regex::Regex;
use serde_json::Value;

/// 回應正規化器：檢視酬載形狀，選擇解析策略，產出統一的列/欄模型。
///
/// 策略優先順序：
/// 1. 預先結構化物件（帶 data 記錄清單）
/// 2. 含百分比的純量文字
/// 3. **Image N** 分隔的區塊文字
/// 4. Markdown 管線表格
///
/// 正規化絕不失敗：格式不良的輸入降級為較少的列或空結果。
pub struct ResponseParser {
    image_marker: Regex,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            // 固定模式，編譯必定成功
            image_marker: Regex::new(r"\*\*\s*Image\s*\d+\s*\*\*").unwrap(),
        }
    }

    /// 將原始酬載正規化為統一形狀。永不回傳錯誤。
    pub fn normalize(&self, payload: &RawPayload) -> NormalizedResult {
        match payload {
            Value::Object(obj) => {
                let scalar_summary = obj
                    .get("percentage")
                    .filter(|v| !v.is_null())
                    .map(|v| match v {
                        Value::String(s) => s.trim().to_string(),
                        other => other.to_string(),
                    });
                let response_text = obj.get("response").and_then(Value::as_str);

                // 優先使用預先結構化的 data 記錄，不重新解析
                if let Some(Value::Array(items)) = obj.get("data") {
                    let rows = records_from_array(items);
                    if !rows.is_empty() {
                        let columns = columns_from_first_row(&rows);
                        tracing::debug!("Normalized {} pre-structured records", rows.len());
                        return NormalizedResult {
                            rows,
                            columns,
                            scalar_summary,
                            text_summary: response_text.map(|t| t.trim().to_string()),
                        };
                    }
                }

                // data 缺漏或為空：退回對 response 文字做分類
                let mut result = match response_text {
                    Some(text) => self.normalize_text(text),
                    None => NormalizedResult::default(),
                };
                if scalar_summary.is_some() {
                    result.scalar_summary = scalar_summary;
                }
                result
            }
            Value::String(text) => self.normalize_text(text),
            _ => NormalizedResult::default(),
        }
    }

    /// 對純文字酬載分類：百分比、Image 區塊、管線表格，否則當作摘要文字。
    fn normalize_text(&self, text: &str) -> NormalizedResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return NormalizedResult::default();
        }

        if trimmed.contains('%') {
            return NormalizedResult {
                scalar_summary: Some(trimmed.to_string()),
                ..Default::default()
            };
        }

        if self.image_marker.is_match(trimmed) {
            return self.parse_image_blocks(trimmed);
        }

        if trimmed.lines().any(|line| line.trim_start().starts_with('|')) {
            return self.parse_pipe_table(trimmed);
        }

        NormalizedResult {
            text_summary: Some(trimmed.to_string()),
            ..Default::default()
        }
    }

    /// 以 **Image N** 標記切塊；每個非空區塊組成一筆記錄。
    /// 每行以第一個冒號切成鍵/值，去除引號與空白；無冒號的行跳過。
    fn parse_image_blocks(&self, text: &str) -> NormalizedResult {
        let mut rows = Vec::new();

        for block in self.image_marker.split(text) {
            let mut record = Record::new();
            for line in block.lines() {
                let Some((key, value)) = line.split_once(':') else {
                    continue;
                };
                let key = trim_cell(key);
                if key.is_empty() {
                    continue;
                }
                record
                    .data
                    .insert(key.to_string(), Value::String(trim_cell(value).to_string()));
            }
            if !record.is_empty() {
                rows.push(record);
            }
        }

        tracing::debug!("Parsed {} image blocks into records", rows.len());
        let columns = columns_from_first_row(&rows);
        NormalizedResult {
            rows,
            columns,
            ..Default::default()
        }
    }

    /// Markdown 管線表格：第一個非分隔列為標頭，其餘各列依位置
    /// 對齊標頭組成記錄。儲存格不足的列留空尾端欄位，不報錯。
    fn parse_pipe_table(&self, text: &str) -> NormalizedResult {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with('|') && !is_separator_row(line));

        let Some(header_line) = lines.next() else {
            return NormalizedResult::default();
        };
        let headers: Vec<String> = split_cells(header_line).map(String::from).collect();
        if headers.is_empty() {
            return NormalizedResult::default();
        }

        let mut rows = Vec::new();
        for line in lines {
            let mut record = Record::new();
            for (header, cell) in headers.iter().zip(split_cells(line)) {
                record
                    .data
                    .insert(header.clone(), Value::String(cell.to_string()));
            }
            // 沒有任何可用儲存格的列整列跳過
            if !record.is_empty() {
                rows.push(record);
            }
        }

        tracing::debug!(
            "Parsed pipe table: {} columns, {} rows",
            headers.len(),
            rows.len()
        );
        NormalizedResult {
            rows,
            columns: headers,
            ..Default::default()
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

// 空物件記錄和 Image 區塊的空區塊一樣直接丟棄，
// 維持「有列就有欄」的不變量
fn records_from_array(items: &[Value]) -> Vec<Record> {
    let mut records = Vec::new();
    for item in items {
        if let Value::Object(obj) = item {
            if !obj.is_empty() {
                records.push(Record { data: obj.clone() });
            }
        }
    }
    records
}

/// 欄位一律取第一列的鍵集合，依該列自身的鍵順序。
/// 欄序隨來源欄位順序而變是已記載的行為，不以字母排序「修正」。
fn columns_from_first_row(rows: &[Record]) -> Vec<String> {
    rows.first()
        .map(|row| row.data.keys().cloned().collect())
        .unwrap_or_default()
}

fn split_cells(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|cell| !cell.is_empty())
}

fn is_separator_row(line: &str) -> bool {
    line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn trim_cell(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(payload: Value) -> NormalizedResult {
        ResponseParser::new().normalize(&payload)
    }

    #[test]
    fn test_scalar_percentage_text() {
        let result = normalize(json!("87%"));
        assert_eq!(result.scalar_summary.as_deref(), Some("87%"));
        assert!(result.rows.is_empty());
        assert!(result.columns.is_empty());
    }

    #[test]
    fn test_percentage_text_is_trimmed() {
        let result = normalize(json!("  42.5%  "));
        assert_eq!(result.scalar_summary.as_deref(), Some("42.5%"));
    }

    #[test]
    fn test_image_blocks() {
        let result = normalize(json!("**Image 1**\nkey: 'val'\n\n**Image 2**\nkey: 'val2'"));
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("key"), Some(&json!("val")));
        assert_eq!(result.rows[1].get("key"), Some(&json!("val2")));
        assert_eq!(result.columns, vec!["key"]);
    }

    #[test]
    fn test_image_block_multi_field_and_quotes() {
        let text = "**Image 1**\nlocation: \"hangar\"\naltitude: 120\n\n**Image 2**\nlocation: 'field'";
        let result = normalize(json!(text));
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("location"), Some(&json!("hangar")));
        assert_eq!(result.rows[0].get("altitude"), Some(&json!("120")));
        assert_eq!(result.columns, vec!["location", "altitude"]);
    }

    #[test]
    fn test_image_block_lines_without_colon_are_skipped() {
        let text = "**Image 1**\nno colon here\nkey: value";
        let result = normalize(json!(text));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].data.len(), 1);
        assert_eq!(result.rows[0].get("key"), Some(&json!("value")));
    }

    #[test]
    fn test_image_empty_blocks_are_dropped() {
        let text = "**Image 1**\n\n**Image 2**\nkey: value";
        let result = normalize(json!(text));
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_markdown_table() {
        let result = normalize(json!("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |"));
        assert_eq!(result.columns, vec!["a", "b"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].get("a"), Some(&json!("1")));
        assert_eq!(result.rows[0].get("b"), Some(&json!("2")));
        assert_eq!(result.rows[1].get("a"), Some(&json!("3")));
        assert_eq!(result.rows[1].get("b"), Some(&json!("4")));
    }

    #[test]
    fn test_markdown_table_header_and_row_counts() {
        // H headers, R data rows -> exactly R records with <= H fields each
        let text = "| id | model | status |\n|----|-------|--------|\n| 1 | hawk | active |\n| 2 | raven | idle |\n| 3 | crow | active |";
        let result = normalize(json!(text));
        assert_eq!(result.columns.len(), 3);
        assert_eq!(result.rows.len(), 3);
        for row in &result.rows {
            assert!(row.data.len() <= 3);
        }
    }

    #[test]
    fn test_markdown_short_row_leaves_trailing_fields_absent() {
        let text = "| a | b | c |\n|---|---|---|\n| 1 | 2 |";
        let result = normalize(json!(text));
        assert_eq!(result.columns, vec!["a", "b", "c"]);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].get("a"), Some(&json!("1")));
        assert_eq!(result.rows[0].get("b"), Some(&json!("2")));
        assert_eq!(result.rows[0].get("c"), None);
    }

    #[test]
    fn test_markdown_row_without_usable_cells_is_skipped() {
        let text = "| a | b |\n|---|---|\n|   |   |\n| 1 | 2 |";
        let result = normalize(json!(text));
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_markdown_table_without_separator_row() {
        let text = "| a | b |\n| 1 | 2 |";
        let result = normalize(json!(text));
        assert_eq!(result.columns, vec!["a", "b"]);
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_pre_structured_data_records() {
        let payload = json!({
            "response": "Found two drones",
            "data": [
                {"id": 1, "model": "hawk"},
                {"id": 2, "model": "raven"}
            ]
        });
        let result = normalize(payload);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.columns, vec!["id", "model"]);
        assert_eq!(result.rows[0].get("id"), Some(&json!(1)));
        assert_eq!(result.text_summary.as_deref(), Some("Found two drones"));
        assert!(result.scalar_summary.is_none());
    }

    #[test]
    fn test_pre_structured_with_percentage() {
        let payload = json!({
            "response": "Coverage report",
            "percentage": "91%",
            "data": [{"sector": "north", "coverage": "91%"}]
        });
        let result = normalize(payload);
        assert_eq!(result.scalar_summary.as_deref(), Some("91%"));
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_heterogeneous_record_fields() {
        // Field sets vary across records; columns follow the first row only
        let payload = json!({
            "data": [
                {"drone_id": "d-1", "battery": 88},
                {"id": "d-2", "batteryLevel": "72", "status": "charging"}
            ]
        });
        let result = normalize(payload);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.columns, vec!["drone_id", "battery"]);
    }

    #[test]
    fn test_empty_data_falls_back_to_response_text() {
        let payload = json!({"response": "no matching drones", "data": []});
        let result = normalize(payload);
        assert!(result.rows.is_empty());
        assert!(result.columns.is_empty());
        assert_eq!(result.text_summary.as_deref(), Some("no matching drones"));
    }

    #[test]
    fn test_missing_data_with_percentage_in_response_text() {
        let payload = json!({"response": "87%"});
        let result = normalize(payload);
        assert_eq!(result.scalar_summary.as_deref(), Some("87%"));
        assert!(result.rows.is_empty());
    }

    #[test]
    fn test_object_response_text_routed_through_table_parsing() {
        let payload = json!({"response": "| a | b |\n|---|---|\n| 1 | 2 |"});
        let result = normalize(payload);
        assert_eq!(result.columns, vec!["a", "b"]);
        assert_eq!(result.rows.len(), 1);
    }

    #[test]
    fn test_plain_text_becomes_text_summary() {
        let result = normalize(json!("The fleet is grounded today."));
        assert!(result.rows.is_empty());
        assert!(result.scalar_summary.is_none());
        assert_eq!(
            result.text_summary.as_deref(),
            Some("The fleet is grounded today.")
        );
    }

    #[test]
    fn test_empty_and_unexpected_payloads_degrade_to_empty_result() {
        assert_eq!(normalize(json!("")), NormalizedResult::default());
        assert_eq!(normalize(json!(null)), NormalizedResult::default());
        assert_eq!(normalize(json!([1, 2, 3])), NormalizedResult::default());
        assert_eq!(normalize(json!({})), NormalizedResult::default());
    }

    #[test]
    fn test_columns_empty_iff_rows_empty() {
        let empty = normalize(json!("just text"));
        assert!(empty.rows.is_empty() && empty.columns.is_empty());

        let full = normalize(json!({"data": [{"k": "v"}]}));
        assert!(full.has_rows() && !full.columns.is_empty());
    }

    #[test]
    fn test_non_object_items_in_data_are_skipped() {
        let payload = json!({"data": [{"id": 1}, "stray", 7, {"id": 2}]});
        let result = normalize(payload);
        assert_eq!(result.rows.len(), 2);
    }

    #[test]
    fn test_empty_object_records_are_dropped() {
        let payload = json!({"data": [{}, {"id": 1}]});
        let result = normalize(payload);
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.columns, vec!["id"]);
    }

    #[test]
    fn test_data_of_only_empty_objects_falls_back_to_response_text() {
        let payload = json!({"response": "nothing useful", "data": [{}, {}]});
        let result = normalize(payload);
        assert!(result.rows.is_empty());
        assert!(result.columns.is_empty());
        assert_eq!(result.text_summary.as_deref(), Some("nothing useful"));
    }
}
