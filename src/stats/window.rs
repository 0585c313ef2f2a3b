use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Calendar granularity of a report. A term is a fixed 13-week block
/// counted from the 1st of January.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportView {
    Day,
    Week,
    Month,
    Term,
    Year,
}

pub const TERM_DAYS: i64 = 13 * 7;

/// One reporting period, resolved to concrete UTC instants.
///
/// `offset` steps whole periods relative to today: 0 is the current
/// period, -1 the previous one. The window is inclusive on both ends;
/// `end` is the last millisecond of the period so that a record stamped
/// exactly at a period boundary belongs to exactly one window.
#[derive(Debug, Clone)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

impl ReportWindow {
    pub fn compute(view: ReportView, offset: i32, today: NaiveDate) -> Result<Self> {
        let (start, next_start, label) = match view {
            ReportView::Day => {
                let day = today + Duration::days(i64::from(offset));
                (
                    day,
                    day + Duration::days(1),
                    day.format("%A %-d %B %Y").to_string(),
                )
            }
            ReportView::Week => {
                let monday = today
                    - Duration::days(i64::from(today.weekday().num_days_from_monday()))
                    + Duration::weeks(i64::from(offset));
                let sunday = monday + Duration::days(6);
                let label = format!(
                    "{} - {}",
                    monday.format("%-d %b"),
                    sunday.format("%-d %b %Y")
                );
                (monday, monday + Duration::weeks(1), label)
            }
            ReportView::Month => {
                let (year, month) = shift_month(today.year(), today.month(), offset);
                let (next_year, next_month) = shift_month(year, month, 1);
                let start = first_of_month(year, month)?;
                (
                    start,
                    first_of_month(next_year, next_month)?,
                    start.format("%B %Y").to_string(),
                )
            }
            ReportView::Term => {
                let jan1 = first_of_month(today.year(), 1)?;
                let current_block = (today - jan1).num_days() / TERM_DAYS;
                let block = current_block + i64::from(offset);
                let start = jan1 + Duration::days(block * TERM_DAYS);
                let label = format!("Term {} {}", block + 1, today.year());
                (start, start + Duration::days(TERM_DAYS), label)
            }
            ReportView::Year => {
                let year = today.year() + offset;
                (
                    first_of_month(year, 1)?,
                    first_of_month(year + 1, 1)?,
                    year.to_string(),
                )
            }
        };

        Ok(Self {
            start: day_start(start),
            end: day_start(next_start) - Duration::milliseconds(1),
            label,
        })
    }

    /// Whole days covered by the window.
    pub fn span_days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days() + 1
    }
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("invalid calendar month {year}-{month:02}"))
}

fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + offset;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn week_starts_monday_and_ends_sunday_night() {
        // 2026-03-12 is a Thursday.
        let window = ReportWindow::compute(ReportView::Week, 0, day(2026, 3, 12)).unwrap();
        assert_eq!(window.start, utc(2026, 3, 9, 0, 0, 0));
        assert_eq!(
            window.end,
            utc(2026, 3, 15, 23, 59, 59) + Duration::milliseconds(999)
        );
        assert_eq!(window.label, "9 Mar - 15 Mar 2026");
    }

    #[test]
    fn month_offset_crosses_year_boundaries() {
        let window = ReportWindow::compute(ReportView::Month, -3, day(2026, 2, 10)).unwrap();
        assert_eq!(window.start, utc(2025, 11, 1, 0, 0, 0));
        assert_eq!(window.label, "November 2025");
        assert_eq!(window.span_days(), 30);
    }

    #[test]
    fn first_term_runs_thirteen_weeks_from_january() {
        let window = ReportWindow::compute(ReportView::Term, 0, day(2026, 3, 12)).unwrap();
        assert_eq!(window.start, utc(2026, 1, 1, 0, 0, 0));
        assert_eq!(
            window.end,
            utc(2026, 4, 1, 23, 59, 59) + Duration::milliseconds(999)
        );
        assert_eq!(window.label, "Term 1 2026");
        assert_eq!(window.span_days(), TERM_DAYS);
    }

    #[test]
    fn term_offset_steps_whole_blocks() {
        let window = ReportWindow::compute(ReportView::Term, 1, day(2026, 3, 12)).unwrap();
        assert_eq!(window.start, utc(2026, 4, 2, 0, 0, 0));
        assert_eq!(window.label, "Term 2 2026");
    }

    #[test]
    fn day_label_spells_out_the_date() {
        let window = ReportWindow::compute(ReportView::Day, 0, day(2026, 3, 10)).unwrap();
        assert_eq!(window.label, "Tuesday 10 March 2026");
        assert_eq!(window.span_days(), 1);
    }

    #[test]
    fn year_window_covers_the_calendar_year() {
        let window = ReportWindow::compute(ReportView::Year, -1, day(2026, 3, 12)).unwrap();
        assert_eq!(window.start, utc(2025, 1, 1, 0, 0, 0));
        assert_eq!(
            window.end,
            utc(2025, 12, 31, 23, 59, 59) + Duration::milliseconds(999)
        );
        assert_eq!(window.label, "2025");
    }

    #[test]
    fn view_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ReportView::Week).unwrap(), "\"week\"");
        let parsed: ReportView = serde_json::from_str("\"term\"").unwrap();
        assert_eq!(parsed, ReportView::Term);
    }
}
