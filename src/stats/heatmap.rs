use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::LogRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub date: NaiveDate,
    pub total_minutes: u32,
}

/// Per-day totals for one calendar year, for the consistency heatmap.
/// Days without any logged minutes are omitted.
pub fn consistency_grid(records: &[LogRecord], year: i32) -> Vec<DayTotal> {
    let mut totals: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for record in records {
        let date = record.date.date_naive();
        if date.year() == year {
            *totals.entry(date).or_insert(0) += record.duration_minutes;
        }
    }

    totals
        .into_iter()
        .map(|(date, total_minutes)| DayTotal {
            date,
            total_minutes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{DateTime, Utc};

    fn record(date: &str, minutes: u32) -> LogRecord {
        let date = DateTime::parse_from_rfc3339(date)
            .unwrap()
            .with_timezone(&Utc);
        LogRecord {
            id: format!("log-{date}"),
            date,
            drill_name: "Wall Ball Rebounds".into(),
            category: Category::SelfTraining,
            duration_minutes: minutes,
            created_at: date,
        }
    }

    #[test]
    fn sums_per_day_within_the_year() {
        let records = vec![
            record("2026-03-10T08:00:00Z", 20),
            record("2026-03-10T19:00:00Z", 15),
            record("2026-03-12T10:00:00Z", 45),
            record("2025-12-31T23:00:00Z", 60),
        ];

        let grid = consistency_grid(&records, 2026);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(grid[0].total_minutes, 35);
        assert_eq!(grid[1].total_minutes, 45);
    }

    #[test]
    fn empty_year_yields_empty_grid() {
        let records = vec![record("2026-03-10T08:00:00Z", 20)];
        assert!(consistency_grid(&records, 2024).is_empty());
    }
}
