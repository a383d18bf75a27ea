use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

const MORNING_START: u32 = 7;
const AFTERNOON_START: u32 = 15;
const NIGHT_START: u32 = 23;

/// Ca trực điều dưỡng, chia cố định 8/8/8 giờ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    /// 07:00 - 14:59
    Morning,
    /// 15:00 - 22:59
    Afternoon,
    /// 23:00 - 06:59, ca duy nhất vắt qua nửa đêm.
    Night,
}

impl Shift {
    /// Thứ tự hiển thị các cột ca.
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    /// Xếp ca theo giờ trong ngày (0-23). Phút và giây không ảnh hưởng.
    pub fn from_hour(hour: u32) -> Self {
        if (MORNING_START..AFTERNOON_START).contains(&hour) {
            Shift::Morning
        } else if (AFTERNOON_START..NIGHT_START).contains(&hour) {
            Shift::Afternoon
        } else {
            Shift::Night
        }
    }

    /// Xếp ca theo giờ đồng hồ địa phương của thời điểm ghi nhận.
    pub fn classify(timestamp: &NaiveDateTime) -> Self {
        Self::from_hour(timestamp.hour())
    }

    pub fn label(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Night => "Night",
        }
    }

    /// Ký hiệu cột trong bảng checklist.
    pub fn code(self) -> &'static str {
        match self {
            Shift::Morning => "M",
            Shift::Afternoon => "A",
            Shift::Night => "N",
        }
    }

    pub fn hours(self) -> &'static str {
        match self {
            Shift::Morning => "07:00-14:59",
            Shift::Afternoon => "15:00-22:59",
            Shift::Night => "23:00-06:59",
        }
    }
}

/// Xếp ca cho một thời điểm ghi nhận.
pub fn classify(timestamp: &NaiveDateTime) -> Shift {
    Shift::classify(timestamp)
}
