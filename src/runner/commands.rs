use tauri::State;

use crate::AppState;

use super::RunnerSnapshot;

#[tauri::command]
pub async fn get_runthrough_state(
    state: State<'_, AppState>,
) -> Result<Option<RunnerSnapshot>, String> {
    Ok(state.runner.get_snapshot().await)
}

#[tauri::command]
pub async fn start_runthrough(
    state: State<'_, AppState>,
    drill_ids: Vec<String>,
    rest_seconds: u32,
) -> Result<RunnerSnapshot, String> {
    state
        .runner
        .start(drill_ids, rest_seconds)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn toggle_runthrough(state: State<'_, AppState>) -> Result<RunnerSnapshot, String> {
    state.runner.toggle().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn skip_phase(state: State<'_, AppState>) -> Result<(), String> {
    state.runner.skip().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn exit_runthrough(state: State<'_, AppState>) -> Result<(), String> {
    state.runner.exit().await.map_err(|e| e.to_string())
}
