//! Logic lõi phân ca trực điều dưỡng và tổng hợp hoạt động theo ca.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

mod aggregate;
mod catalog;
mod config;
mod grouping;
mod shift;
mod summary;

pub use aggregate::ActivityAggregator;
pub use catalog::{ActivityCatalog, ActivityField, ActivitySection};
pub use config::{ShiftViewConfig, SPECIFY_ACTIVITIES};
pub use grouping::{group_by_shift, ShiftGroups};
pub use shift::{classify, Shift};
pub use summary::{
    ActivityRow, AggregationResult, SectionSummary, ShiftCell, ShiftTotals, ShiftViewSummary,
};

/// Giá trị của một trường hoạt động trong `data`.
///
/// Bản ghi đến từ nhiều kiểu form khác nhau (checkbox HTML, boolean gốc, chuỗi
/// đã serialize) nên cùng một hoạt động có thể mang nhiều dạng giá trị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Mảng hoặc object, giữ nguyên dạng JSON đã render.
    Other(String),
}

impl FieldValue {
    /// Hoạt động được coi là đã thực hiện khi giá trị là `true`, `"true"`,
    /// `1`, `"1"` hoặc `"on"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(flag) => *flag,
            FieldValue::Number(value) => *value == 1.0,
            FieldValue::Text(text) => matches!(text.as_str(), "true" | "1" | "on"),
            FieldValue::Null | FieldValue::Other(_) => false,
        }
    }

    /// Văn bản hiển thị của giá trị, `None` khi giá trị rỗng.
    ///
    /// `null`, `false`, `0`, `NaN` và chuỗi rỗng đều bị coi là không có nội dung.
    pub fn display_text(&self) -> Option<String> {
        match self {
            FieldValue::Null | FieldValue::Bool(false) => None,
            FieldValue::Bool(true) => Some("true".to_string()),
            FieldValue::Number(value) if *value == 0.0 || value.is_nan() => None,
            FieldValue::Number(value) => Some(format_number(*value)),
            FieldValue::Text(text) | FieldValue::Other(text) if text.is_empty() => None,
            FieldValue::Text(text) | FieldValue::Other(text) => Some(text.clone()),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

fn format_number(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Người ghi nhận bản ghi.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Recorder {
    pub name: Option<String>,
}

impl Recorder {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Một lần ghi nhận checklist hoạt động điều dưỡng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    /// Giờ đồng hồ địa phương lúc thực hiện. Chỉ bắt buộc với bản ghi có `data`.
    pub timestamp: Option<NaiveDateTime>,
    /// Các trường hoạt động; `None` khi form chưa có dữ liệu.
    pub data: Option<BTreeMap<String, FieldValue>>,
    pub recorded_by: Option<Recorder>,
}

impl ActivityRecord {
    /// Bản ghi chưa có dữ liệu và chưa rõ người ghi.
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp: Some(timestamp),
            data: None,
            recorded_by: None,
        }
    }

    /// Bản ghi không có thời điểm ghi nhận.
    pub fn undated() -> Self {
        Self {
            timestamp: None,
            data: None,
            recorded_by: None,
        }
    }

    /// Gán một trường vào `data`, tạo `data` nếu chưa có.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_data(mut self, data: BTreeMap<String, FieldValue>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn recorded_by(mut self, name: impl Into<String>) -> Self {
        self.recorded_by = Some(Recorder::named(name));
        self
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Ca của bản ghi; `None` khi không có thời điểm.
    pub fn shift(&self) -> Option<Shift> {
        self.timestamp.as_ref().map(Shift::classify)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.data.as_ref()?.get(key)
    }

    /// Trường `key` có giá trị "đã thực hiện" hay không.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.field(key).is_some_and(FieldValue::is_truthy)
    }

    /// Văn bản không rỗng của trường `key`.
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.field(key).and_then(FieldValue::display_text)
    }

    /// Tên người ghi, bỏ qua tên rỗng.
    pub fn recorder_name(&self) -> Option<&str> {
        self.recorded_by
            .as_ref()
            .and_then(|recorder| recorder.name.as_deref())
            .filter(|name| !name.is_empty())
    }
}

/// Lỗi chung khi đọc dữ liệu ca trực.
#[derive(Debug, thiserror::Error)]
pub enum ShiftViewError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Bản ghi #{index} có thời điểm không hợp lệ: {value}")]
    InvalidTimestamp { index: usize, value: String },
    #[error("Lỗi khác: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_representations() {
        let truthy: [FieldValue; 5] = [
            true.into(),
            "true".into(),
            1.into(),
            "1".into(),
            "on".into(),
        ];
        for value in truthy {
            assert!(value.is_truthy(), "{value:?} phải là truthy");
        }

        let falsy: [FieldValue; 8] = [
            false.into(),
            0.into(),
            "false".into(),
            FieldValue::Null,
            "yes".into(),
            2.into(),
            "ON".into(),
            FieldValue::Other("[true]".to_string()),
        ];
        for value in falsy {
            assert!(!value.is_truthy(), "{value:?} phải là falsy");
        }
    }

    #[test]
    fn display_text_skips_empty_values() {
        assert_eq!(FieldValue::Null.display_text(), None);
        assert_eq!(FieldValue::from(false).display_text(), None);
        assert_eq!(FieldValue::from(0).display_text(), None);
        assert_eq!(FieldValue::from(f64::NAN).display_text(), None);
        assert_eq!(FieldValue::from("").display_text(), None);

        assert_eq!(FieldValue::from(true).display_text().as_deref(), Some("true"));
        assert_eq!(FieldValue::from(5).display_text().as_deref(), Some("5"));
        assert_eq!(FieldValue::from(2.5).display_text().as_deref(), Some("2.5"));
        assert_eq!(
            FieldValue::from("Heparin").display_text().as_deref(),
            Some("Heparin")
        );
    }

    #[test]
    fn recorder_name_ignores_blank() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .expect("valid timestamp");

        assert_eq!(ActivityRecord::new(at).recorder_name(), None);
        assert_eq!(ActivityRecord::new(at).recorded_by("").recorder_name(), None);
        assert_eq!(
            ActivityRecord::new(at).recorded_by("Alice").recorder_name(),
            Some("Alice")
        );
    }

    #[test]
    fn missing_data_is_never_truthy() {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .expect("valid timestamp");

        let record = ActivityRecord::new(at);
        assert!(!record.has_data());
        assert!(!record.is_truthy("oralCare"));

        assert_eq!(record.shift(), Some(Shift::Morning));
        assert_eq!(ActivityRecord::undated().shift(), None);

        let record = record.with_field("oralCare", "on");
        assert!(record.has_data());
        assert!(record.is_truthy("oralCare"));
        assert!(!record.is_truthy("turning"));
    }
}
