use serde::{Deserialize, Serialize};

use crate::Shift;

/// Kết quả của một cặp (ca, hoạt động).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AggregationResult {
    pub performed: bool,
    pub count: usize,
    /// Chuỗi rỗng khi không có bản ghi nào.
    pub detail_text: String,
}

/// Một ô ca trong bảng checklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShiftCell {
    pub performed: bool,
    pub count: usize,
    pub detail: Option<String>,
}

impl ShiftCell {
    /// `—` khi chưa thực hiện, `✓` cho một lần, `✓ (n)` khi nhiều lần.
    pub fn mark(&self) -> String {
        match (self.performed, self.count) {
            (false, _) => "—".to_string(),
            (true, count) if count > 1 => format!("✓ ({count})"),
            (true, _) => "✓".to_string(),
        }
    }
}

impl From<AggregationResult> for ShiftCell {
    fn from(result: AggregationResult) -> Self {
        Self {
            performed: result.performed,
            count: result.count,
            detail: if result.detail_text.is_empty() {
                None
            } else {
                Some(result.detail_text)
            },
        }
    }
}

/// Một hoạt động với ba cột ca và cột ghi chú tổng hợp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityRow {
    pub key: String,
    pub label: String,
    pub morning: ShiftCell,
    pub afternoon: ShiftCell,
    pub night: ShiftCell,
    pub remarks: Option<String>,
}

impl ActivityRow {
    pub fn cell(&self, shift: Shift) -> &ShiftCell {
        match shift {
            Shift::Morning => &self.morning,
            Shift::Afternoon => &self.afternoon,
            Shift::Night => &self.night,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionSummary {
    pub title: String,
    pub rows: Vec<ActivityRow>,
}

/// Số bản ghi đã vào từng ca.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShiftTotals {
    pub morning: usize,
    pub afternoon: usize,
    pub night: usize,
}

impl ShiftTotals {
    pub fn get(&self, shift: Shift) -> usize {
        match shift {
            Shift::Morning => self.morning,
            Shift::Afternoon => self.afternoon,
            Shift::Night => self.night,
        }
    }
}

/// Kết quả tổng hợp cuối cùng cho cả danh mục.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ShiftViewSummary {
    /// Tổng số bản ghi đầu vào, kể cả bản ghi không có `data`.
    pub total_records: usize,
    pub has_records: bool,
    pub shift_totals: ShiftTotals,
    pub sections: Vec<SectionSummary>,
}

impl ShiftViewSummary {
    /// Tìm dòng theo khóa hoạt động.
    pub fn row(&self, key: &str) -> Option<&ActivityRow> {
        self.sections
            .iter()
            .flat_map(|section| section.rows.iter())
            .find(|row| row.key == key)
    }
}
