use crate::core::compare::compare_cells;
use crate::domain::model::{Record, SortDirection};

/// 展示狀態：保存原始列順序的不可變快照與可重排的目前檢視。
/// 排序絕不動到 original_rows；每次排序/重設都以新的 Vec 取代
/// current_rows，絕不與快照共用同一份序列。
#[derive(Debug, Clone)]
pub struct DisplayState {
    original_rows: Vec<Record>,
    current_rows: Vec<Record>,
    sort_column: Option<String>,
    sort_direction: SortDirection,
}

impl DisplayState {
    /// 每次成功正規化新查詢結果時整組重建
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            current_rows: rows.clone(),
            original_rows: rows,
            sort_column: None,
            sort_direction: SortDirection::Original,
        }
    }

    pub fn current_rows(&self) -> &[Record] {
        &self.current_rows
    }

    pub fn original_rows(&self) -> &[Record] {
        &self.original_rows
    }

    pub fn sort_column(&self) -> Option<&str> {
        self.sort_column.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// 三態排序循環。點選欄位 C 的轉移規則：
    /// - 未選欄或換了欄：選取 C，升冪
    /// - C 已是升冪：轉降冪
    /// - C 已是降冪：回到原始順序，清除選取（不重新排序）
    pub fn sort_by(&mut self, column: &str) -> &[Record] {
        let same_column = self.sort_column.as_deref() == Some(column);

        match (same_column, self.sort_direction) {
            (true, SortDirection::Ascending) => {
                self.sort_direction = SortDirection::Descending;
                self.apply_sort(column, SortDirection::Descending);
            }
            (true, SortDirection::Descending) => {
                self.reset_sort();
            }
            _ => {
                self.sort_column = Some(column.to_string());
                self.sort_direction = SortDirection::Ascending;
                self.apply_sort(column, SortDirection::Ascending);
            }
        }

        &self.current_rows
    }

    /// 任何狀態下皆可呼叫：清除排序欄，還原原始順序。
    pub fn reset_sort(&mut self) -> &[Record] {
        self.sort_column = None;
        self.sort_direction = SortDirection::Original;
        self.current_rows = self.original_rows.clone();
        &self.current_rows
    }

    fn apply_sort(&mut self, column: &str, direction: SortDirection) {
        let mut rows = self.current_rows.clone();
        // slice::sort_by 是穩定排序；降冪只是交換比較器參數，
        // 相等元素保留既有相對順序
        rows.sort_by(|a, b| match direction {
            SortDirection::Descending => compare_cells(b.get(column), a.get(column)),
            _ => compare_cells(a.get(column), b.get(column)),
        });
        self.current_rows = rows;
    }
}
