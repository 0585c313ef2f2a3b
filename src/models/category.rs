//! Activity categories.
//!
//! The category set is closed: every record carries one of these variants,
//! and each variant owns its display metadata. Unknown category strings in
//! stored data are a parse error, not a silently-styled bucket.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Match,
    #[serde(rename = "Club Training")]
    ClubTraining,
    #[serde(rename = "Self Training")]
    SelfTraining,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Match,
        Category::ClubTraining,
        Category::SelfTraining,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Match => "Match",
            Category::ClubTraining => "Club Training",
            Category::SelfTraining => "Self Training",
        }
    }

    pub fn parse(value: &str) -> Result<Category> {
        match value {
            "Match" => Ok(Category::Match),
            "Club Training" => Ok(Category::ClubTraining),
            "Self Training" => Ok(Category::SelfTraining),
            other => Err(anyhow!("unknown category '{other}'")),
        }
    }

    /// Chart color for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Match => "#f59e0b",
            Category::ClubTraining => "#6366f1",
            Category::SelfTraining => "#06b6d4",
        }
    }

    /// Pre-filled duration when logging a session of this category by hand.
    pub fn default_manual_minutes(&self) -> u32 {
        match self {
            Category::SelfTraining => 30,
            Category::Match | Category::ClubTraining => 90,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_parse_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_is_an_error() {
        assert!(Category::parse("Stretching").is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&Category::ClubTraining).unwrap();
        assert_eq!(json, "\"Club Training\"");
    }
}
