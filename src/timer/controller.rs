use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    audio::ChimeHandle,
    db::Database,
    models::{Drill, LogRecord},
    utils::format::format_mmss,
    wake::WakeLock,
};

use super::{TimerState, TimerTick};

use tauri::{AppHandle, Emitter};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub drill: Drill,
    pub time_remaining: u32,
    pub display: String,
    pub is_active: bool,
    pub finished: bool,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            drill: state.drill.clone(),
            time_remaining: state.time_remaining,
            display: format_mmss(state.time_remaining),
            is_active: state.is_active,
            finished: state.finished,
        }
    }
}

/// Drives the single-drill countdown. Completion only chimes and marks the
/// timer finished; the log record waits for an explicit confirm.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<Option<TimerState>>>,
    db: Database,
    app_handle: AppHandle,
    chime: ChimeHandle,
    wake: Arc<Mutex<WakeLock>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(app_handle: AppHandle, db: Database, chime: ChimeHandle) -> Self {
        Self {
            state: Arc::new(Mutex::new(None)),
            db,
            app_handle,
            chime,
            wake: Arc::new(Mutex::new(WakeLock::new())),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn get_snapshot(&self) -> Option<TimerSnapshot> {
        self.state.lock().await.as_ref().map(TimerSnapshot::from)
    }

    pub async fn start(&self, drill_id: &str) -> Result<TimerSnapshot> {
        {
            let state = self.state.lock().await;
            if state.as_ref().is_some_and(|s| !s.finished) {
                return Err(anyhow!("a drill timer is already in progress"));
            }
        }

        let drill = self.db.get_drill(drill_id).await?;
        if drill.default_minutes == 0 {
            return Err(anyhow!("drill '{}' has no duration", drill.name));
        }

        info!("Drill timer started for '{}'", drill.name);
        let new_state = TimerState::new(drill);
        let snapshot = TimerSnapshot::from(&new_state);
        *self.state.lock().await = Some(new_state);
        self.emit_state_changed().await;
        Ok(snapshot)
    }

    pub async fn toggle(&self) -> Result<TimerSnapshot> {
        let now_active = {
            let mut guard = self.state.lock().await;
            let state = guard
                .as_mut()
                .ok_or_else(|| anyhow!("no drill timer in progress"))?;
            if state.finished {
                return Err(anyhow!("drill timer already finished"));
            }
            state.is_active = !state.is_active;
            state.is_active
        };

        if now_active {
            self.wake.lock().await.acquire();
            self.spawn_ticker().await;
        } else {
            self.cancel_ticker().await;
            self.wake.lock().await.release();
        }

        self.emit_state_changed().await;
        self.get_snapshot()
            .await
            .ok_or_else(|| anyhow!("drill timer state vanished"))
    }

    /// Write the log record for the current drill and clear the timer.
    /// `duration_minutes` lets the user adjust the saved minutes; it
    /// defaults to the drill's planned duration.
    pub async fn confirm(&self, duration_minutes: Option<u32>) -> Result<LogRecord> {
        let drill = {
            let guard = self.state.lock().await;
            let state = guard
                .as_ref()
                .ok_or_else(|| anyhow!("no drill timer to confirm"))?;
            state.drill.clone()
        };

        self.cancel_ticker().await;
        self.wake.lock().await.release();

        let minutes = duration_minutes.unwrap_or(drill.default_minutes);
        let record = self
            .db
            .insert_log(Utc::now(), drill.name.clone(), drill.category, minutes)
            .await?;

        info!("Logged {}m of '{}'", record.duration_minutes, record.drill_name);

        *self.state.lock().await = None;
        self.emit_state_changed().await;
        let _ = self.app_handle.emit("logs-changed", ());

        Ok(record)
    }

    /// Abandon the timer without writing anything.
    pub async fn cancel(&self) -> Result<()> {
        self.cancel_ticker().await;
        self.wake.lock().await.release();
        *self.state.lock().await = None;
        self.emit_state_changed().await;
        Ok(())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let app_handle = self.app_handle.clone();
        let chime = self.chime.clone();
        let wake = self.wake.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.tick().await;

            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    let Some(timer) = guard.as_mut() else { break };
                    let outcome = timer.tick();
                    (outcome, TimerSnapshot::from(&*timer))
                };

                let Some(outcome) = outcome else { break };

                let _ = app_handle.emit("timer-state-changed", Some(snapshot.clone()));

                if outcome == TimerTick::Finished {
                    chime.play_whistle();
                    wake.lock().await.release();
                    let _ = app_handle.emit("timer-finished", snapshot);
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.get_snapshot().await;
        let _ = self.app_handle.emit("timer-state-changed", snapshot);
    }
}
