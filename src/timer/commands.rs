use tauri::State;

use crate::{models::LogRecord, AppState};

use super::TimerSnapshot;

#[tauri::command]
pub async fn get_drill_timer_state(
    state: State<'_, AppState>,
) -> Result<Option<TimerSnapshot>, String> {
    Ok(state.timer.get_snapshot().await)
}

#[tauri::command]
pub async fn start_drill_timer(
    state: State<'_, AppState>,
    drill_id: String,
) -> Result<TimerSnapshot, String> {
    state.timer.start(&drill_id).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_drill_timer(state: State<'_, AppState>) -> Result<TimerSnapshot, String> {
    state.timer.toggle().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn confirm_drill_log(
    state: State<'_, AppState>,
    duration_minutes: Option<u32>,
) -> Result<LogRecord, String> {
    state
        .timer
        .confirm(duration_minutes)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn cancel_drill_timer(state: State<'_, AppState>) -> Result<(), String> {
    state.timer.cancel().await.map_err(|e| e.to_string())
}
