//! action.rs — catalog entries supplied by the presentation layer.
//!
//! The engine only reads these. `icon` is the primary matching key for every
//! heuristic; `label` is a secondary, substring-matched key for rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Crisis,
    Wellness,
    Tracking,
    Therapy,
    Social,
    Professional,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub is_emergency: bool,
}

impl Action {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
            category: None,
            is_emergency: false,
        }
    }

    /// Builder: set category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder: mark as emergency.
    pub fn emergency(mut self) -> Self {
        self.is_emergency = true;
        self
    }

    pub fn is_crisis(&self) -> bool {
        self.is_emergency || self.category == Some(Category::Crisis)
    }

    pub fn icon_in(&self, icons: &[&str]) -> bool {
        icons.contains(&self.icon.as_str())
    }

    /// Icon equality, or case-insensitive substring of the label.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        if self.icon == keyword {
            return true;
        }
        self.label
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}
