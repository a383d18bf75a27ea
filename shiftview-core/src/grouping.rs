use serde::Serialize;
use tracing::{debug, trace};

use crate::{ActivityRecord, Shift};

/// Bản ghi đã chia theo ca, giữ nguyên thứ tự đầu vào trong từng ca.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShiftGroups<'a> {
    pub morning: Vec<&'a ActivityRecord>,
    pub afternoon: Vec<&'a ActivityRecord>,
    pub night: Vec<&'a ActivityRecord>,
}

impl<'a> ShiftGroups<'a> {
    /// Chia bản ghi theo ca. Bản ghi không có `data` bị loại khỏi mọi ca.
    pub fn from_records(records: &'a [ActivityRecord]) -> Self {
        let mut groups = Self::default();
        let mut dropped = 0usize;

        for (index, record) in records.iter().enumerate() {
            if !record.has_data() {
                trace!(index, "bỏ qua bản ghi không có data");
                dropped += 1;
                continue;
            }
            let Some(shift) = record.shift() else {
                debug!(index, "bỏ qua bản ghi có data nhưng thiếu thời điểm");
                dropped += 1;
                continue;
            };
            groups.bucket_mut(shift).push(record);
        }

        debug!(
            total = records.len(),
            morning = groups.morning.len(),
            afternoon = groups.afternoon.len(),
            night = groups.night.len(),
            dropped,
            "đã chia bản ghi theo ca"
        );

        groups
    }

    pub fn bucket(&self, shift: Shift) -> &[&'a ActivityRecord] {
        match shift {
            Shift::Morning => &self.morning,
            Shift::Afternoon => &self.afternoon,
            Shift::Night => &self.night,
        }
    }

    fn bucket_mut(&mut self, shift: Shift) -> &mut Vec<&'a ActivityRecord> {
        match shift {
            Shift::Morning => &mut self.morning,
            Shift::Afternoon => &mut self.afternoon,
            Shift::Night => &mut self.night,
        }
    }

    /// Các ca theo thứ tự sáng, chiều, đêm.
    pub fn iter(&self) -> impl Iterator<Item = (Shift, &[&'a ActivityRecord])> + '_ {
        Shift::ALL.into_iter().map(|shift| (shift, self.bucket(shift)))
    }

    /// Tổng số bản ghi đã vào ca (không tính bản ghi bị loại).
    pub fn len(&self) -> usize {
        self.morning.len() + self.afternoon.len() + self.night.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chia bản ghi theo ca; đầu vào vắng mặt được coi là danh sách rỗng.
pub fn group_by_shift(records: Option<&[ActivityRecord]>) -> ShiftGroups<'_> {
    ShiftGroups::from_records(records.unwrap_or_default())
}
