//! Bridge WASM <-> JavaScript trung lập framework.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use shiftview_core::{ActivityCatalog, Shift, ShiftViewConfig, ShiftViewError};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsShiftViewConfig {
    #[serde(default)]
    specify_fields: Option<BTreeMap<String, String>>,
    #[serde(default)]
    remarks_field: Option<String>,
    #[serde(default)]
    unknown_recorder: Option<String>,
}

impl From<JsShiftViewConfig> for ShiftViewConfig {
    fn from(cfg: JsShiftViewConfig) -> Self {
        let mut base = ShiftViewConfig::default();
        if let Some(fields) = cfg.specify_fields {
            base.specify_fields = fields;
        }
        if let Some(field) = cfg.remarks_field {
            base.remarks_field = field;
        }
        if let Some(label) = cfg.unknown_recorder {
            base.unknown_recorder = label;
        }
        base
    }
}

/// Dựng bảng tổng hợp theo ca từ danh sách bản ghi JS.
///
/// `catalog` vắng mặt thì dùng checklist điều dưỡng chuẩn.
#[wasm_bindgen]
pub fn summarize_records(
    records: JsValue,
    config: Option<JsValue>,
    catalog: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let records_value = if records.is_undefined() {
        serde_json::Value::Null
    } else {
        from_value::<serde_json::Value>(records)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được danh sách bản ghi: {err}")))?
    };

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsShiftViewConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            ShiftViewConfig::from(cfg)
        }
        None => ShiftViewConfig::default(),
    };

    let catalog = match catalog {
        Some(js_catalog) => from_value::<ActivityCatalog>(js_catalog)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được danh mục: {err}")))?,
        None => shiftview_records::nursing_checklist_catalog(),
    };

    let summary = shiftview_records::summarize_records_value(&records_value, &cfg, &catalog)
        .map_err(|err| JsValue::from_str(&format_shift_view_error(err)))?;

    to_value(&summary)
        .map_err(|err| JsValue::from_str(&format!("Không serialize bảng tổng hợp: {err}")))
}

/// Ca trực (`morning`, `afternoon`, `night`) của một giờ trong ngày.
#[wasm_bindgen]
pub fn shift_for_hour(hour: u32) -> String {
    match Shift::from_hour(hour) {
        Shift::Morning => "morning",
        Shift::Afternoon => "afternoon",
        Shift::Night => "night",
    }
    .to_string()
}

fn format_shift_view_error(err: ShiftViewError) -> String {
    format!("Shift view error: {err}")
}
