use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 原始回應酬載：送交正規化前的未定型 JSON 值。
/// 可能是純字串（百分比、區塊文字、管線表格）或含 data/percentage 的物件。
pub type RawPayload = Value;

/// 結果表格的一列：開放式欄位名稱到值的映射。
/// 欄位集合不固定，隨回應版本而異；serde_json 的 preserve_order
/// 讓鍵維持來源插入順序，欄位推導依賴這一點。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self {
            data: serde_json::Map::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// 正規化後的統一形狀：不論來源酬載是哪種形狀都產出這個結構。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    pub rows: Vec<Record>,
    pub columns: Vec<String>,
    pub scalar_summary: Option<String>,
    pub text_summary: Option<String>,
}

impl NormalizedResult {
    /// 顯示時 scalar_summary 優先於表格列
    pub fn headline(&self) -> Option<&str> {
        self.scalar_summary.as_deref()
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// 三態排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Original,
    Ascending,
    Descending,
}
