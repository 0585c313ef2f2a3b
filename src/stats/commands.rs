use chrono::Utc;
use tauri::State;

use crate::AppState;

use super::{heatmap, heatmap::DayTotal, ReportView, StatsReport};

#[tauri::command]
pub async fn get_stats_report(
    state: State<'_, AppState>,
    view: ReportView,
    offset: i32,
) -> Result<StatsReport, String> {
    let records = state.db.list_logs().await.map_err(|e| e.to_string())?;
    let goal = state.settings.goals();
    super::aggregate(&records, view, offset, Utc::now().date_naive(), &goal)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_consistency_grid(
    state: State<'_, AppState>,
    year: i32,
) -> Result<Vec<DayTotal>, String> {
    let records = state.db.list_logs().await.map_err(|e| e.to_string())?;
    Ok(heatmap::consistency_grid(&records, year))
}
