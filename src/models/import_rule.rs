use serde::{Deserialize, Serialize};

/// A description matcher that assigns a category name during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub pattern: String,
    pub category: String,
    #[serde(default)]
    pub is_regex: bool,
}

impl CategoryRule {
    pub fn new_contains(pattern: String, category: String) -> Self {
        Self {
            pattern,
            category,
            is_regex: false,
        }
    }

    pub fn new_regex(pattern: String, category: String) -> Self {
        Self {
            pattern,
            category,
            is_regex: true,
        }
    }
}
