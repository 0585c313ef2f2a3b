//! Read-side statistics over the log collection.
//!
//! Everything here is a pure projection: given the full record set and a
//! reporting window, recompute totals, goal progress and chart buckets
//! from scratch. Nothing is cached and nothing is written.

pub mod commands;
pub mod heatmap;
pub mod window;

pub use window::{ReportView, ReportWindow};

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::Serialize;

use crate::models::{Category, LogRecord};
use crate::settings::GoalSettings;

const WEEK_DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySlice {
    pub category: Category,
    pub color: &'static str,
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBucket {
    pub label: String,
    pub total_minutes: u32,
    pub by_category: Vec<CategorySlice>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub view: ReportView,
    pub offset: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
    pub session_count: usize,
    pub total_minutes: u32,
    /// Minutes from categories that count toward the goal.
    pub goal_minutes: u32,
    /// The weekly goal scaled to this window's length, in minutes.
    pub scaled_goal_minutes: f64,
    /// Raw percentage; the UI clamps for display, the ratio stays honest.
    pub goal_percent: f64,
    pub buckets: Vec<ChartBucket>,
    pub category_totals: Vec<CategorySlice>,
}

/// How the weekly goal stretches or shrinks to a window length.
fn goal_scale(view: ReportView) -> f64 {
    match view {
        ReportView::Day => 1.0 / 7.0,
        ReportView::Week => 1.0,
        ReportView::Month => 4.33,
        ReportView::Term => 13.0,
        ReportView::Year => 52.0,
    }
}

fn bucket_labels(view: ReportView, window: &ReportWindow) -> Vec<String> {
    match view {
        ReportView::Day => (0..24).map(|hour| format!("{hour:02}:00")).collect(),
        ReportView::Week => WEEK_DAYS.iter().map(|day| (*day).to_string()).collect(),
        ReportView::Month => {
            let days = window.span_days();
            let weeks = (days + 6) / 7;
            (1..=weeks).map(|week| format!("Wk {week}")).collect()
        }
        ReportView::Term => (1..=13).map(|week| format!("Wk {week}")).collect(),
        ReportView::Year => MONTHS.iter().map(|month| (*month).to_string()).collect(),
    }
}

/// Assign a record to exactly one bucket by its occurrence time. Callers
/// only pass dates inside the window; the clamp is for the window's final
/// instant landing on a partial trailing week.
fn bucket_index(view: ReportView, date: DateTime<Utc>, window: &ReportWindow) -> usize {
    match view {
        ReportView::Day => date.hour() as usize,
        ReportView::Week => date.date_naive().weekday().num_days_from_monday() as usize,
        ReportView::Month => date.day0() as usize / 7,
        ReportView::Term => {
            let days = (date.date_naive() - window.start.date_naive()).num_days();
            days.max(0) as usize / 7
        }
        ReportView::Year => date.month0() as usize,
    }
}

pub fn aggregate(
    records: &[LogRecord],
    view: ReportView,
    offset: i32,
    today: NaiveDate,
    goal: &GoalSettings,
) -> Result<StatsReport> {
    let window = ReportWindow::compute(view, offset, today)?;

    let filtered: Vec<&LogRecord> = records
        .iter()
        .filter(|record| record.date >= window.start && record.date <= window.end)
        .collect();

    let total_minutes: u32 = filtered.iter().map(|r| r.duration_minutes).sum();
    let goal_minutes: u32 = filtered
        .iter()
        .filter(|r| goal.goal_categories.contains(&r.category))
        .map(|r| r.duration_minutes)
        .sum();

    let scaled_goal_minutes = goal.weekly_goal_hours * 60.0 * goal_scale(view);
    let goal_percent = if scaled_goal_minutes > 0.0 {
        f64::from(goal_minutes) / scaled_goal_minutes * 100.0
    } else {
        0.0
    };

    let labels = bucket_labels(view, &window);
    let mut per_bucket = vec![[0u32; Category::ALL.len()]; labels.len()];
    for record in &filtered {
        let index = bucket_index(view, record.date, &window).min(labels.len() - 1);
        let category_index = Category::ALL
            .iter()
            .position(|c| *c == record.category)
            .unwrap_or(0);
        per_bucket[index][category_index] += record.duration_minutes;
    }

    let buckets = labels
        .into_iter()
        .zip(per_bucket)
        .map(|(label, totals)| ChartBucket {
            label,
            total_minutes: totals.iter().sum(),
            by_category: Category::ALL
                .iter()
                .zip(totals)
                .filter(|(_, minutes)| *minutes > 0)
                .map(|(category, minutes)| CategorySlice {
                    category: *category,
                    color: category.color(),
                    minutes,
                })
                .collect(),
        })
        .collect();

    let category_totals = Category::ALL
        .iter()
        .map(|category| CategorySlice {
            category: *category,
            color: category.color(),
            minutes: filtered
                .iter()
                .filter(|r| r.category == *category)
                .map(|r| r.duration_minutes)
                .sum(),
        })
        .collect();

    Ok(StatsReport {
        view,
        offset,
        start: window.start,
        end: window.end,
        label: window.label,
        session_count: filtered.len(),
        total_minutes,
        goal_minutes,
        scaled_goal_minutes,
        goal_percent,
        buckets,
        category_totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(date: &str, category: Category, minutes: u32) -> LogRecord {
        let date = DateTime::parse_from_rfc3339(date)
            .unwrap()
            .with_timezone(&Utc);
        LogRecord {
            id: format!("log-{date}"),
            date,
            drill_name: "Circle Shooting".into(),
            category,
            duration_minutes: minutes,
            created_at: date,
        }
    }

    fn goal_of(hours: f64) -> GoalSettings {
        GoalSettings {
            weekly_goal_hours: hours,
            goal_categories: vec![Category::SelfTraining, Category::ClubTraining],
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tuesday_record_lands_in_week_bucket_one() {
        // 2026-03-10 is a Tuesday; today 2026-03-12 is in the same week.
        let records = vec![record("2026-03-10T12:00:00Z", Category::SelfTraining, 90)];
        let report = aggregate(
            &records,
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.buckets.len(), 7);
        assert_eq!(report.buckets[1].label, "Tue");
        assert_eq!(report.buckets[1].total_minutes, 90);
        assert_eq!(report.total_minutes, 90);
    }

    #[test]
    fn wednesday_record_lands_in_week_bucket_two() {
        let records = vec![record("2026-03-11T08:00:00Z", Category::Match, 60)];
        let report = aggregate(
            &records,
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.buckets[2].label, "Wed");
        assert_eq!(report.buckets[2].total_minutes, 60);
    }

    #[test]
    fn period_end_is_inclusive_to_the_millisecond() {
        // Week of Mon 2026-03-09 ends at 2026-03-15T23:59:59.999Z.
        let at_end = record("2026-03-15T23:59:59.999Z", Category::SelfTraining, 30);
        let past_end = record("2026-03-16T00:00:00.000Z", Category::SelfTraining, 30);

        let report = aggregate(
            &[at_end, past_end],
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.session_count, 1);
        assert_eq!(report.total_minutes, 30);
    }

    #[test]
    fn year_goal_is_fifty_two_weeks() {
        let report = aggregate(&[], ReportView::Year, 0, day(2026, 3, 12), &goal_of(6.0)).unwrap();
        assert_eq!(report.scaled_goal_minutes, 52.0 * 6.0 * 60.0);
    }

    #[test]
    fn goal_percent_only_counts_goal_categories() {
        let records = vec![
            record("2026-03-10T12:00:00Z", Category::SelfTraining, 90),
            record("2026-03-11T12:00:00Z", Category::Match, 120),
        ];
        let report = aggregate(
            &records,
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.total_minutes, 210);
        assert_eq!(report.goal_minutes, 90);
        let expected = 90.0 / (6.0 * 60.0) * 100.0;
        assert!((report.goal_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn goal_percent_is_not_clamped() {
        let records = vec![record("2026-03-10T12:00:00Z", Category::SelfTraining, 600)];
        let report = aggregate(
            &records,
            ReportView::Day,
            -2,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();
        // Window is the single day 2026-03-10; target is 6h/7 per day.
        assert!(report.goal_percent > 100.0);
    }

    #[test]
    fn month_buckets_split_by_week_of_month() {
        let records = vec![
            record("2026-03-03T12:00:00Z", Category::SelfTraining, 15),
            record("2026-03-10T12:00:00Z", Category::SelfTraining, 20),
            record("2026-03-31T12:00:00Z", Category::SelfTraining, 25),
        ];
        let report = aggregate(
            &records,
            ReportView::Month,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        // March has 31 days: five partial-or-full weeks.
        assert_eq!(report.buckets.len(), 5);
        assert_eq!(report.buckets[0].total_minutes, 15);
        assert_eq!(report.buckets[1].total_minutes, 20);
        assert_eq!(report.buckets[4].total_minutes, 25);
    }

    #[test]
    fn day_view_buckets_by_hour() {
        let records = vec![
            record("2026-03-12T07:15:00Z", Category::SelfTraining, 10),
            record("2026-03-12T07:45:00Z", Category::Match, 20),
            record("2026-03-12T21:00:00Z", Category::ClubTraining, 30),
        ];
        let report = aggregate(
            &records,
            ReportView::Day,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.buckets.len(), 24);
        assert_eq!(report.buckets[7].total_minutes, 30);
        assert_eq!(report.buckets[7].by_category.len(), 2);
        assert_eq!(report.buckets[21].total_minutes, 30);
    }

    #[test]
    fn category_totals_cover_the_closed_set() {
        let records = vec![
            record("2026-03-10T12:00:00Z", Category::SelfTraining, 45),
            record("2026-03-11T12:00:00Z", Category::SelfTraining, 15),
        ];
        let report = aggregate(
            &records,
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();

        assert_eq!(report.category_totals.len(), Category::ALL.len());
        let self_training = report
            .category_totals
            .iter()
            .find(|t| t.category == Category::SelfTraining)
            .unwrap();
        assert_eq!(self_training.minutes, 60);
    }

    #[test]
    fn offset_selects_an_earlier_week() {
        let records = vec![record("2026-03-04T12:00:00Z", Category::SelfTraining, 50)];

        let this_week = aggregate(
            &records,
            ReportView::Week,
            0,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();
        assert_eq!(this_week.session_count, 0);

        let last_week = aggregate(
            &records,
            ReportView::Week,
            -1,
            day(2026, 3, 12),
            &goal_of(6.0),
        )
        .unwrap();
        assert_eq!(last_week.session_count, 1);
        assert_eq!(
            last_week.start,
            Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap()
        );
    }
}
