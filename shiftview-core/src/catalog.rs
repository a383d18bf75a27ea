use serde::{Deserialize, Serialize};

/// Một dòng trong checklist: khóa hoạt động và nhãn hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityField {
    pub key: String,
    pub label: String,
}

impl ActivityField {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Nhóm hoạt động có tiêu đề riêng trong bảng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ActivitySection {
    pub title: String,
    pub fields: Vec<ActivityField>,
}

impl ActivitySection {
    pub fn new(title: impl Into<String>, fields: Vec<ActivityField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }
}

/// Danh mục hoạt động do bên gọi cung cấp, giữ nguyên thứ tự.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ActivityCatalog {
    pub sections: Vec<ActivitySection>,
}

impl ActivityCatalog {
    pub fn new(sections: Vec<ActivitySection>) -> Self {
        Self { sections }
    }

    /// Toàn bộ hoạt động theo thứ tự các nhóm.
    pub fn fields(&self) -> impl Iterator<Item = &ActivityField> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn find(&self, key: &str) -> Option<&ActivityField> {
        self.fields().find(|field| field.key == key)
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
