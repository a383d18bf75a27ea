use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Hoạt động có trường văn bản kèm theo `<key>Specify`.
pub const SPECIFY_ACTIVITIES: [&str; 5] = [
    "procedurePreparation",
    "referralFacilitation",
    "dvtProphylaxis",
    "pudProphylaxis",
    "vapBundles",
];

/// Quy tắc dựng chuỗi chi tiết cho từng hoạt động.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShiftViewConfig {
    /// Khóa hoạt động -> tên trường văn bản đi kèm.
    pub specify_fields: BTreeMap<String, String>,
    /// Trường ghi chú chung của bản ghi, nối vào mọi hoạt động.
    pub remarks_field: String,
    /// Tên hiển thị khi không rõ người ghi.
    pub unknown_recorder: String,
}

impl Default for ShiftViewConfig {
    fn default() -> Self {
        Self {
            specify_fields: SPECIFY_ACTIVITIES
                .iter()
                .map(|key| (key.to_string(), format!("{key}Specify")))
                .collect(),
            remarks_field: "nursingActivitiesRemarks".to_string(),
            unknown_recorder: "Unknown".to_string(),
        }
    }
}

impl ShiftViewConfig {
    /// Tên trường văn bản đi kèm của hoạt động, nếu có.
    pub fn specify_field(&self, activity_key: &str) -> Option<&str> {
        self.specify_fields.get(activity_key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_maps_specify_activities() {
        let config = ShiftViewConfig::default();
        assert_eq!(config.specify_fields.len(), 5);
        assert_eq!(
            config.specify_field("dvtProphylaxis"),
            Some("dvtProphylaxisSpecify")
        );
        assert_eq!(config.specify_field("oralCare"), None);
        assert_eq!(config.remarks_field, "nursingActivitiesRemarks");
        assert_eq!(config.unknown_recorder, "Unknown");
    }
}
