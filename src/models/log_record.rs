//! Log record data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Category;

/// One completed (or manually entered) activity instance.
///
/// `drill_name` and `category` are copies taken at logging time; there is
/// no foreign key back to the drill. Only `duration_minutes` is ever
/// edited after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    /// Occurrence time. May be backdated for manual entries, so it is not
    /// necessarily `created_at`.
    pub date: DateTime<Utc>,
    pub drill_name: String,
    pub category: Category,
    pub duration_minutes: u32,
    pub created_at: DateTime<Utc>,
}

/// Input data for a manual log entry. A missing duration falls back to
/// the category's usual session length, a missing date to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInput {
    pub drill_name: String,
    pub category: Category,
    pub duration_minutes: Option<u32>,
    pub date: Option<DateTime<Utc>>,
}
