use tracing::debug;

use crate::{
    ActivityCatalog, ActivityRecord, ActivityRow, AggregationResult, SectionSummary, Shift,
    ShiftCell, ShiftGroups, ShiftTotals, ShiftViewConfig, ShiftViewSummary,
};

const SEGMENT_SEPARATOR: &str = " | ";

/// Truy vấn chỉ đọc trên các bản ghi đã chia ca.
///
/// Việc chia ca chỉ chạy một lần khi khởi tạo; mọi truy vấn sau đó quét lại
/// danh sách của ca tương ứng và không thay đổi trạng thái.
#[derive(Debug, Clone)]
pub struct ActivityAggregator<'a> {
    groups: ShiftGroups<'a>,
    total_records: usize,
    config: &'a ShiftViewConfig,
}

impl<'a> ActivityAggregator<'a> {
    /// Khởi tạo từ danh sách bản ghi; `None` được coi là danh sách rỗng.
    pub fn new(records: Option<&'a [ActivityRecord]>, config: &'a ShiftViewConfig) -> Self {
        let records = records.unwrap_or_default();
        Self {
            groups: ShiftGroups::from_records(records),
            total_records: records.len(),
            config,
        }
    }

    pub fn groups(&self) -> &ShiftGroups<'a> {
        &self.groups
    }

    /// Tổng số bản ghi đầu vào, kể cả bản ghi bị loại vì thiếu `data`.
    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn shift_totals(&self) -> ShiftTotals {
        ShiftTotals {
            morning: self.groups.morning.len(),
            afternoon: self.groups.afternoon.len(),
            night: self.groups.night.len(),
        }
    }

    fn performed_records<'s>(
        &'s self,
        shift: Shift,
        activity_key: &'s str,
    ) -> impl Iterator<Item = &'a ActivityRecord> + 's {
        self.groups
            .bucket(shift)
            .iter()
            .copied()
            .filter(move |record| record.is_truthy(activity_key))
    }

    /// Có ít nhất một bản ghi trong ca đánh dấu hoạt động đã thực hiện.
    pub fn is_checked(&self, shift: Shift, activity_key: &str) -> bool {
        self.performed_records(shift, activity_key).next().is_some()
    }

    /// Số lần hoạt động được ghi nhận trong ca.
    pub fn count(&self, shift: Shift, activity_key: &str) -> usize {
        self.performed_records(shift, activity_key).count()
    }

    /// Chuỗi chi tiết các lần thực hiện trong ca, `None` khi không có lần nào.
    pub fn details(&self, shift: Shift, activity_key: &str) -> Option<String> {
        let segments: Vec<String> = self
            .performed_records(shift, activity_key)
            .map(|record| self.detail_segment(record, activity_key))
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(segments.join(SEGMENT_SEPARATOR))
        }
    }

    /// Chi tiết của cả ba ca nối lại, bỏ qua ca trống.
    pub fn cross_shift_details(&self, activity_key: &str) -> Option<String> {
        let parts: Vec<String> = Shift::ALL
            .into_iter()
            .filter_map(|shift| self.details(shift, activity_key))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(SEGMENT_SEPARATOR))
        }
    }

    pub fn aggregate(&self, shift: Shift, activity_key: &str) -> AggregationResult {
        let count = self.count(shift, activity_key);
        AggregationResult {
            performed: count > 0,
            count,
            detail_text: self.details(shift, activity_key).unwrap_or_default(),
        }
    }

    /// Dựng bảng tổng hợp cho toàn bộ danh mục.
    pub fn summarize(&self, catalog: &ActivityCatalog) -> ShiftViewSummary {
        let sections = catalog
            .sections
            .iter()
            .map(|section| SectionSummary {
                title: section.title.clone(),
                rows: section
                    .fields
                    .iter()
                    .map(|field| ActivityRow {
                        key: field.key.clone(),
                        label: field.label.clone(),
                        morning: ShiftCell::from(self.aggregate(Shift::Morning, &field.key)),
                        afternoon: ShiftCell::from(self.aggregate(Shift::Afternoon, &field.key)),
                        night: ShiftCell::from(self.aggregate(Shift::Night, &field.key)),
                        remarks: self.cross_shift_details(&field.key),
                    })
                    .collect(),
            })
            .collect();

        debug!(
            total_records = self.total_records,
            activities = catalog.len(),
            "đã dựng bảng tổng hợp theo ca"
        );

        ShiftViewSummary {
            total_records: self.total_records,
            has_records: self.total_records > 0,
            shift_totals: self.shift_totals(),
            sections,
        }
    }

    fn detail_segment(&self, record: &ActivityRecord, activity_key: &str) -> String {
        let recorder = record
            .recorder_name()
            .unwrap_or(self.config.unknown_recorder.as_str());
        let time = record
            .timestamp
            .map(|at| at.format("%H:%M").to_string())
            .unwrap_or_default();
        let mut segment = format!("{time} ({recorder})");

        if let Some(specify) = self
            .config
            .specify_field(activity_key)
            .and_then(|field| record.field_text(field))
        {
            segment.push_str(" - ");
            segment.push_str(&specify);
        }

        if let Some(remarks) = record.field_text(&self.config.remarks_field) {
            segment.push_str(" - Note: ");
            segment.push_str(&remarks);
        }

        segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityField, ActivitySection, FieldValue};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn empty_input_yields_defaults() {
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(None, &config);

        assert_eq!(aggregator.total_records(), 0);
        for shift in Shift::ALL {
            assert!(!aggregator.is_checked(shift, "oralCare"));
            assert_eq!(aggregator.count(shift, "oralCare"), 0);
            assert_eq!(aggregator.details(shift, "oralCare"), None);
            assert_eq!(aggregator.aggregate(shift, "oralCare"), AggregationResult::default());
        }
        assert_eq!(aggregator.cross_shift_details("oralCare"), None);
    }

    #[test]
    fn details_join_in_bucket_order() {
        let records = vec![
            ActivityRecord::new(at(7, 5))
                .with_field("suctioning", true)
                .recorded_by("Alice"),
            ActivityRecord::new(at(8, 10)).with_field("suctioning", "on"),
            ActivityRecord::new(at(9, 0))
                .with_field("suctioning", 1)
                .recorded_by("Bob"),
        ];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.details(Shift::Morning, "suctioning").as_deref(),
            Some("07:05 (Alice) | 08:10 (Unknown) | 09:00 (Bob)")
        );
        assert_eq!(aggregator.count(Shift::Morning, "suctioning"), 3);
        assert!(aggregator.is_checked(Shift::Morning, "suctioning"));
        assert!(!aggregator.is_checked(Shift::Night, "suctioning"));
    }

    #[test]
    fn specify_suffix_only_for_mapped_activities() {
        let records = vec![ActivityRecord::new(at(10, 30))
            .with_field("dvtProphylaxis", true)
            .with_field("dvtProphylaxisSpecify", "Heparin")
            .with_field("oralCare", true)
            .with_field("oralCareSpecify", "Chlorhexidine")
            .recorded_by("Alice")];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.details(Shift::Morning, "dvtProphylaxis").as_deref(),
            Some("10:30 (Alice) - Heparin")
        );
        assert_eq!(
            aggregator.details(Shift::Morning, "oralCare").as_deref(),
            Some("10:30 (Alice)")
        );
    }

    #[test]
    fn remarks_follow_specify_suffix() {
        let records = vec![ActivityRecord::new(at(16, 45))
            .with_field("vapBundles", "true")
            .with_field("vapBundlesSpecify", "HOB 30°")
            .with_field("nursingActivitiesRemarks", "stable")
            .recorded_by("Carol")];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.details(Shift::Afternoon, "vapBundles").as_deref(),
            Some("16:45 (Carol) - HOB 30° - Note: stable")
        );
    }

    #[test]
    fn empty_companion_fields_are_skipped() {
        let records = vec![ActivityRecord::new(at(1, 0))
            .with_field("pudProphylaxis", true)
            .with_field("pudProphylaxisSpecify", "")
            .with_field("nursingActivitiesRemarks", FieldValue::Null)];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.details(Shift::Night, "pudProphylaxis").as_deref(),
            Some("01:00 (Unknown)")
        );
    }

    #[test]
    fn custom_config_drives_details() {
        let mut config = ShiftViewConfig::default();
        config
            .specify_fields
            .insert("woundCare".to_string(), "woundSite".to_string());
        config.remarks_field = "comment".to_string();
        config.unknown_recorder = "N/A".to_string();

        let records = vec![ActivityRecord::new(at(12, 0))
            .with_field("woundCare", true)
            .with_field("woundSite", "sacrum")
            .with_field("comment", "dressing changed")
            .with_field("nursingActivitiesRemarks", "ignored")];
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.details(Shift::Morning, "woundCare").as_deref(),
            Some("12:00 (N/A) - sacrum - Note: dressing changed")
        );
    }

    #[test]
    fn cross_shift_details_skip_empty_shifts() {
        let records = vec![
            ActivityRecord::new(at(23, 30))
                .with_field("turning", true)
                .recorded_by("Dan"),
            ActivityRecord::new(at(8, 0))
                .with_field("turning", true)
                .recorded_by("Alice"),
            ActivityRecord::new(at(17, 0)).with_field("turning", false),
        ];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(
            aggregator.cross_shift_details("turning").as_deref(),
            Some("08:00 (Alice) | 23:30 (Dan)")
        );
    }

    #[test]
    fn records_without_data_count_only_toward_total() {
        let records = vec![
            ActivityRecord::new(at(8, 0)),
            ActivityRecord::undated(),
            ActivityRecord::new(at(9, 0)).with_field("oralCare", true),
        ];
        let config = ShiftViewConfig::default();
        let aggregator = ActivityAggregator::new(Some(records.as_slice()), &config);

        assert_eq!(aggregator.total_records(), 3);
        assert_eq!(aggregator.shift_totals().morning, 1);
        assert_eq!(aggregator.count(Shift::Morning, "oralCare"), 1);
    }

    #[test]
    fn summarize_builds_rows_per_section() {
        let catalog = ActivityCatalog::new(vec![
            ActivitySection::new(
                "Part I",
                vec![ActivityField::new("providedPrivacy", "Provided Privacy")],
            ),
            ActivitySection::new(
                "Part II",
                vec![
                    ActivityField::new("suctioning", "Suctioning"),
                    ActivityField::new("oralCare", "Oral Care"),
                ],
            ),
        ]);
        let records = vec![
            ActivityRecord::new(at(7, 0))
                .with_field("suctioning", true)
                .recorded_by("Alice"),
            ActivityRecord::new(at(11, 0))
                .with_field("suctioning", "1")
                .recorded_by("Alice"),
            ActivityRecord::new(at(3, 0))
                .with_field("providedPrivacy", "on")
                .recorded_by("Dan"),
            ActivityRecord::new(at(19, 0)),
        ];
        let config = ShiftViewConfig::default();
        let summary = ActivityAggregator::new(Some(records.as_slice()), &config).summarize(&catalog);

        assert_eq!(summary.total_records, 4);
        assert!(summary.has_records);
        assert_eq!(
            summary.shift_totals,
            ShiftTotals {
                morning: 2,
                afternoon: 0,
                night: 1
            }
        );
        assert_eq!(summary.sections.len(), 2);

        let suctioning = summary.row("suctioning").expect("row exists");
        assert_eq!(suctioning.morning.mark(), "✓ (2)");
        assert_eq!(suctioning.cell(Shift::Afternoon).mark(), "—");
        assert_eq!(
            suctioning.remarks.as_deref(),
            Some("07:00 (Alice) | 11:00 (Alice)")
        );

        let privacy = summary.row("providedPrivacy").expect("row exists");
        assert_eq!(privacy.night.mark(), "✓");
        assert_eq!(privacy.night.detail.as_deref(), Some("03:00 (Dan)"));

        let oral = summary.row("oralCare").expect("row exists");
        assert_eq!(oral.remarks, None);
        assert!(Shift::ALL.into_iter().all(|shift| !oral.cell(shift).performed));
    }
}
