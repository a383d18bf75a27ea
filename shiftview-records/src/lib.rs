//! JSON to shift view converter: activity records, catalogs and detail rules.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use shiftview_core::{
    ActivityAggregator, ActivityCatalog, ActivityField, ActivityRecord, ActivitySection,
    FieldValue, Recorder, ShiftViewConfig, ShiftViewError, ShiftViewSummary,
};
use tracing::debug;

/// Parse activity records from a JSON string.
pub fn parse_records_str(records_json: &str) -> Result<Vec<ActivityRecord>, ShiftViewError> {
    let value: Value =
        serde_json::from_str(records_json).map_err(|err| ShiftViewError::Parse(err.to_string()))?;
    parse_records_value(&value)
}

/// Parse activity records from a `serde_json::Value`.
///
/// Accepts a bare array, an object with a `records` array, or `null` for an
/// absent list.
pub fn parse_records_value(value: &Value) -> Result<Vec<ActivityRecord>, ShiftViewError> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        Value::Object(object) => match object.get("records") {
            Some(Value::Array(entries)) => entries,
            Some(Value::Null) => return Ok(Vec::new()),
            Some(other) => {
                return Err(ShiftViewError::Parse(format!(
                    "Expected records array, received {}",
                    json_type(other)
                )))
            }
            None => return Err(ShiftViewError::MissingData),
        },
        other => {
            return Err(ShiftViewError::Parse(format!(
                "Expected array of records, received {}",
                json_type(other)
            )))
        }
    };

    let records = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_record(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(records = records.len(), "parsed activity records");
    Ok(records)
}

/// Build the full shift summary from a JSON record list.
pub fn summarize_records_str(
    records_json: &str,
    config: &ShiftViewConfig,
    catalog: &ActivityCatalog,
) -> Result<ShiftViewSummary, ShiftViewError> {
    let records = parse_records_str(records_json)?;
    Ok(ActivityAggregator::new(Some(records.as_slice()), config).summarize(catalog))
}

/// Build the full shift summary from a `serde_json::Value` record list.
pub fn summarize_records_value(
    records: &Value,
    config: &ShiftViewConfig,
    catalog: &ActivityCatalog,
) -> Result<ShiftViewSummary, ShiftViewError> {
    let records = parse_records_value(records)?;
    Ok(ActivityAggregator::new(Some(records.as_slice()), config).summarize(catalog))
}

/// Parse a catalog of the form `{ "sections": [{ "title", "fields": [{ "key", "label" }] }] }`.
pub fn parse_catalog_str(catalog_json: &str) -> Result<ActivityCatalog, ShiftViewError> {
    serde_json::from_str(catalog_json).map_err(|err| ShiftViewError::Parse(err.to_string()))
}

pub fn parse_catalog_value(catalog: Value) -> Result<ActivityCatalog, ShiftViewError> {
    serde_json::from_value(catalog).map_err(|err| ShiftViewError::Parse(err.to_string()))
}

/// Parse detail rules; missing fields keep their defaults.
pub fn parse_config_str(config_json: &str) -> Result<ShiftViewConfig, ShiftViewError> {
    serde_json::from_str(config_json).map_err(|err| ShiftViewError::Parse(err.to_string()))
}

pub fn parse_config_value(config: Value) -> Result<ShiftViewConfig, ShiftViewError> {
    serde_json::from_value(config).map_err(|err| ShiftViewError::Parse(err.to_string()))
}

/// The standard nursing activities checklist, in display order.
pub fn nursing_checklist_catalog() -> ActivityCatalog {
    ActivityCatalog::new(
        NURSING_CHECKLIST
            .iter()
            .map(|(title, fields)| {
                ActivitySection::new(
                    *title,
                    fields
                        .iter()
                        .map(|(key, label)| ActivityField::new(*key, *label))
                        .collect(),
                )
            })
            .collect(),
    )
}

fn parse_record(index: usize, entry: &Value) -> Result<ActivityRecord, ShiftViewError> {
    let Some(object) = entry.as_object() else {
        return Err(ShiftViewError::Parse(format!(
            "Record #{index} must be an object, received {}",
            json_type(entry)
        )));
    };

    let data = match object.get("data") {
        Some(Value::Object(fields)) => Some(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), field_value(value)))
                .collect::<BTreeMap<_, _>>(),
        ),
        Some(Value::Null) | None => None,
        Some(other) => {
            debug!(index, kind = json_type(other), "record data is not an object, no fields");
            Some(BTreeMap::new())
        }
    };

    // Records without data never reach a shift bucket, so their timestamp is not needed.
    let raw_timestamp = object.get("timestamp");
    let timestamp = match raw_timestamp.and_then(parse_timestamp) {
        Some(timestamp) => Some(timestamp),
        None if data.is_none() => None,
        None => {
            return Err(ShiftViewError::InvalidTimestamp {
                index,
                value: raw_timestamp.map_or_else(|| "null".to_string(), Value::to_string),
            })
        }
    };

    let recorded_by = object
        .get("recordedBy")
        .and_then(Value::as_object)
        .map(|recorder| Recorder {
            name: recorder
                .get("name")
                .and_then(|name| field_value(name).display_text()),
        });

    Ok(ActivityRecord {
        timestamp,
        data,
        recorded_by,
    })
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(FieldValue::Number)
            .unwrap_or_else(|| FieldValue::Other(number.to_string())),
        Value::String(text) => FieldValue::Text(text.clone()),
        Value::Array(_) | Value::Object(_) => FieldValue::Other(value.to_string()),
    }
}

fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(text) => parse_datetime(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|instant| instant.naive_utc()),
        _ => None,
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

const NAIVE_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

type SectionTable = (&'static str, &'static [(&'static str, &'static str)]);

const NURSING_CHECKLIST: [SectionTable; 3] = [
    (
        "Part I - Comfort, Safety and Privacy Interventions",
        &[
            ("comfortSafetyPrivacy", "Comfort, Safety and Privacy Interventions"),
            ("moderateHighBackRest", "Placed on Moderate/High Back Rest"),
            ("checkedNGTPlacement", "Checked NGT Placement"),
            ("maintainedSpecialMattress", "Maintained Special Mattress"),
            ("maintainedRestraints", "Maintained Restraints"),
            ("providedPrivacy", "Provided Privacy"),
        ],
    ),
    (
        "Part I - Psychosocial/Spiritual Nursing Interventions",
        &[
            ("renderedSpiritualSupport", "Rendered Spiritual Support"),
            ("explainedProcedure", "Explained Procedure/Intervention"),
            ("allowedCommunication", "Allowed to Communicate Feelings"),
            ("providedEmotionalSupport", "Provided Emotional Support"),
            ("orientedPersonPlaceTime", "Oriented to Person, Place and Time"),
        ],
    ),
    (
        "Part II - Nursing Activities",
        &[
            ("suctioning", "Suctioning"),
            ("tracheostomyCare", "Tracheostomy Care"),
            ("drainedMVTubes", "Drained Mechanical Ventilator Tubes"),
            ("oralCare", "Oral Care"),
            ("feedingTubes", "Feeding Tubes"),
            ("chestPulmophysiotherapy", "Chest Pulmophysiotherapy"),
            ("romExercises", "ROM Exercises"),
            ("turning", "Turning"),
            ("woundCare", "Wound Care"),
            ("perineumCare", "Perineum Care"),
            ("spongeBath", "Sponge Bath"),
            ("bloodExtraction", "Blood Extraction"),
            ("specimenCollection", "Specimen Collection"),
            ("prescriptionProvision", "Prescription Provision"),
            ("procedurePreparation", "Procedure Preparation"),
            ("referralFacilitation", "Referral Facilitation"),
            ("dvtProphylaxis", "DVT Prophylaxis"),
            ("pudProphylaxis", "PUD Prophylaxis"),
            ("vapBundles", "VAP Bundles of Care"),
        ],
    ),
];
