mod audio;
mod db;
mod models;
mod runner;
mod settings;
mod stats;
mod timer;
mod utils;
mod wake;

use audio::ChimeHandle;
use chrono::Utc;
use db::Database;
use log::info;
use models::{Drill, DrillInput, LogInput, LogRecord};
use runner::{
    commands::{
        exit_runthrough, get_runthrough_state, skip_phase, start_runthrough, toggle_runthrough,
    },
    RunnerController,
};
use settings::{GoalSettings, SettingsStore};
use stats::commands::{get_consistency_grid, get_stats_report};
use tauri::{AppHandle, Emitter, Manager, State};
use timer::{
    commands::{
        cancel_drill_timer, confirm_drill_log, get_drill_timer_state, start_drill_timer,
        toggle_drill_timer,
    },
    TimerController,
};

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) runner: RunnerController,
    pub(crate) timer: TimerController,
    pub(crate) settings: SettingsStore,
}

#[tauri::command]
async fn list_drills(state: State<'_, AppState>) -> Result<Vec<Drill>, String> {
    state.db.list_drills().await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn create_drill(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    input: DrillInput,
) -> Result<Drill, String> {
    let drill = state
        .db
        .insert_drill(input)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("drills-changed", ());
    Ok(drill)
}

#[tauri::command]
async fn update_drill(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    drill_id: String,
    input: DrillInput,
) -> Result<Drill, String> {
    let drill = state
        .db
        .update_drill(&drill_id, input)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("drills-changed", ());
    Ok(drill)
}

#[tauri::command]
async fn delete_drill(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    drill_id: String,
) -> Result<(), String> {
    state
        .db
        .delete_drill(&drill_id)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("drills-changed", ());
    Ok(())
}

#[tauri::command]
async fn list_logs(state: State<'_, AppState>) -> Result<Vec<LogRecord>, String> {
    state.db.list_logs().await.map_err(|e| e.to_string())
}

/// Record a session that happened off the clock, e.g. a match or a club
/// night entered after the fact.
#[tauri::command]
async fn log_manual_entry(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    input: LogInput,
) -> Result<LogRecord, String> {
    let minutes = input
        .duration_minutes
        .unwrap_or(input.category.default_manual_minutes());
    let date = input.date.unwrap_or_else(Utc::now);

    let record = state
        .db
        .insert_log(date, input.drill_name, input.category, minutes)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("logs-changed", ());
    Ok(record)
}

/// Log a drill as done right now without running its timer.
#[tauri::command]
async fn log_drill_now(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    drill_id: String,
    duration_minutes: Option<u32>,
) -> Result<LogRecord, String> {
    let drill = state
        .db
        .get_drill(&drill_id)
        .await
        .map_err(|e| e.to_string())?;
    let minutes = duration_minutes.unwrap_or(drill.default_minutes);

    let record = state
        .db
        .insert_log(Utc::now(), drill.name, drill.category, minutes)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("logs-changed", ());
    Ok(record)
}

#[tauri::command]
async fn update_log_duration(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    log_id: String,
    duration_minutes: u32,
) -> Result<LogRecord, String> {
    let record = state
        .db
        .update_log_duration(&log_id, duration_minutes)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("logs-changed", ());
    Ok(record)
}

#[tauri::command]
async fn delete_log(
    state: State<'_, AppState>,
    app_handle: AppHandle,
    log_id: String,
) -> Result<(), String> {
    state
        .db
        .delete_log(&log_id)
        .await
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("logs-changed", ());
    Ok(())
}

#[tauri::command]
fn get_goal_settings(state: State<AppState>) -> Result<GoalSettings, String> {
    Ok(state.settings.goals())
}

#[tauri::command]
fn set_goal_settings(
    state: State<AppState>,
    app_handle: AppHandle,
    goals: GoalSettings,
) -> Result<(), String> {
    state
        .settings
        .update_goals(goals.clone())
        .map_err(|e| e.to_string())?;
    let _ = app_handle.emit("goal-settings-changed", &goals);
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Courtside starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("courtside.sqlite3");
                let database = Database::new(db_path)?;

                // First launch gets the starter drill library.
                {
                    let db_for_seed = database.clone();
                    let seeded = tauri::async_runtime::block_on(async move {
                        db_for_seed.seed_default_drills().await
                    })?;
                    if seeded > 0 {
                        info!("Seeded {seeded} default drills");
                    }
                }

                let chime = ChimeHandle::new();
                let runner_controller = RunnerController::new(
                    app.handle().clone(),
                    database.clone(),
                    chime.clone(),
                );
                let timer_controller =
                    TimerController::new(app.handle().clone(), database.clone(), chime);

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;

                app.manage(AppState {
                    db: database,
                    runner: runner_controller,
                    timer: timer_controller,
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            list_drills,
            create_drill,
            update_drill,
            delete_drill,
            list_logs,
            log_manual_entry,
            log_drill_now,
            update_log_duration,
            delete_log,
            get_runthrough_state,
            start_runthrough,
            toggle_runthrough,
            skip_phase,
            exit_runthrough,
            get_drill_timer_state,
            start_drill_timer,
            toggle_drill_timer,
            confirm_drill_log,
            cancel_drill_timer,
            get_stats_report,
            get_consistency_grid,
            get_goal_settings,
            set_goal_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
