//! Drill data models.
//!
//! A drill is a reusable template for a timed activity: a name, a default
//! duration in minutes, and a category. Drills are templates only; log
//! records copy the fields they need, so editing or deleting a drill never
//! rewrites history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drill {
    pub id: String,
    pub name: String,
    pub default_minutes: u32,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating or updating a drill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillInput {
    pub name: String,
    pub default_minutes: u32,
    pub category: Category,
}

/// Drills seeded the first time the app runs with an empty library.
pub fn default_drills() -> Vec<DrillInput> {
    [
        ("Circle Shooting", 15),
        ("Wall Ball Rebounds", 10),
        ("Agility Shuttles", 15),
        ("Post-Up Drills", 10),
        ("Footwork Patterns", 20),
    ]
    .into_iter()
    .map(|(name, default_minutes)| DrillInput {
        name: name.to_string(),
        default_minutes,
        category: Category::SelfTraining,
    })
    .collect()
}
