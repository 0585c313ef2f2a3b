use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle, time};

use crate::{
    audio::ChimeHandle,
    db::Database,
    models::{Drill, LogRecord},
    utils::format::format_mmss,
    wake::WakeLock,
};

use super::{Phase, RunnerState, TickOutcome};

use tauri::{AppHandle, Emitter};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSnapshot {
    pub queue: Vec<Drill>,
    pub current_index: usize,
    pub phase: Phase,
    pub time_remaining: u32,
    pub display: String,
    pub is_active: bool,
    pub rest_seconds: u32,
    pub finished: bool,
}

impl From<&RunnerState> for RunnerSnapshot {
    fn from(state: &RunnerState) -> Self {
        Self {
            queue: state.queue.clone(),
            current_index: state.current_index,
            phase: state.phase,
            time_remaining: state.time_remaining,
            display: format_mmss(state.time_remaining),
            is_active: state.is_active,
            rest_seconds: state.rest_seconds,
            finished: state.finished,
        }
    }
}

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct PhaseLoggedEvent {
    record: LogRecord,
}

/// Drives a [`RunnerState`] with a one-second tokio ticker and performs
/// the side effects each transition owes: the log write, the chime, the
/// wake lock, and UI events.
#[derive(Clone)]
pub struct RunnerController {
    state: Arc<Mutex<Option<RunnerState>>>,
    db: Database,
    app_handle: AppHandle,
    chime: ChimeHandle,
    wake: Arc<Mutex<WakeLock>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl RunnerController {
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

    pub async fn get_snapshot(&self) -> Option<RunnerSnapshot> {
        self.state.lock().await.as_ref().map(RunnerSnapshot::from)
    }

    /// Build the runthrough queue and park it at Work(0), not yet ticking.
    pub async fn start(
        &self,
        drill_ids: Vec<String>,
        rest_seconds: u32,
    ) -> Result<RunnerSnapshot> {
        {
            let state = self.state.lock().await;
            if state.as_ref().is_some_and(|s| !s.finished) {
                return Err(anyhow!("a runthrough is already in progress"));
            }
        }

        let mut queue = Vec::with_capacity(drill_ids.len());
        for drill_id in &drill_ids {
            queue.push(self.db.get_drill(drill_id).await?);
        }

        let new_state = RunnerState::new(queue, rest_seconds)?;
        info!(
            "Runthrough started: {} drills, {}s rest",
            new_state.queue.len(),
            rest_seconds
        );

        let snapshot = RunnerSnapshot::from(&new_state);
        *self.state.lock().await = Some(new_state);
        self.emit_state_changed().await;
        Ok(snapshot)
    }

    /// Flip the countdown on or off. The ticker task only exists while the
    /// runner is active, and the wake lock follows it.
    pub async fn toggle(&self) -> Result<RunnerSnapshot> {
        let now_active = {
            let mut guard = self.state.lock().await;
            let state = guard
                .as_mut()
                .ok_or_else(|| anyhow!("no runthrough in progress"))?;
            if state.finished {
                return Err(anyhow!("runthrough already finished"));
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
            .ok_or_else(|| anyhow!("runthrough state vanished"))
    }

    /// Fast-forward the current phase; the transition runs on the next
    /// tick, exactly as a natural expiry would.
    pub async fn skip(&self) -> Result<()> {
        {
            let mut guard = self.state.lock().await;
            let state = guard
                .as_mut()
                .ok_or_else(|| anyhow!("no runthrough in progress"))?;
            state.skip();
        }
        self.emit_state_changed().await;
        Ok(())
    }

    /// Abandon the run. No partial record is written for an unfinished
    /// phase.
    pub async fn exit(&self) -> Result<()> {
        self.cancel_ticker().await;
        self.wake.lock().await.release();
        *self.state.lock().await = None;
        self.emit_state_changed().await;
        info!("Runthrough exited");
        Ok(())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let app_handle = self.app_handle.clone();
        let db = self.db.clone();
        let chime = self.chime.clone();
        let wake = self.wake.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first interval tick fires immediately; skip it so the
            // countdown holds its starting value for a full second.
            interval.tick().await;

            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    let Some(runner) = guard.as_mut() else { break };
                    let outcome = runner.tick();
                    (outcome, RunnerSnapshot::from(&*runner))
                };

                let Some(outcome) = outcome else { break };

                match outcome {
                    TickOutcome::Ticked => {
                        emit_runner_state(&app_handle, &snapshot);
                    }
                    TickOutcome::RestCompleted => {
                        chime.play_whistle();
                        emit_runner_state(&app_handle, &snapshot);
                    }
                    TickOutcome::WorkCompleted { drill, finished } => {
                        chime.play_whistle();

                        // Planned duration, not elapsed: a skipped phase
                        // logs the same minutes as a completed one.
                        match db
                            .insert_log(
                                Utc::now(),
                                drill.name.clone(),
                                drill.category,
                                drill.default_minutes,
                            )
                            .await
                        {
                            Ok(record) => {
                                info!(
                                    "Logged {}m of '{}' from runthrough",
                                    record.duration_minutes, record.drill_name
                                );
                                let _ = app_handle
                                    .emit("runner-phase-logged", PhaseLoggedEvent { record });
                                let _ = app_handle.emit("logs-changed", ());
                            }
                            Err(err) => {
                                error!("Failed to write runthrough log: {err:#}");
                            }
                        }

                        emit_runner_state(&app_handle, &snapshot);

                        if finished {
                            wake.lock().await.release();
                            let _ = app_handle.emit("runthrough-complete", ());
                            info!("Runthrough complete");
                            break;
                        }
                    }
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
        let _ = self.app_handle.emit("runner-state-changed", snapshot);
    }
}

fn emit_runner_state(app_handle: &AppHandle, snapshot: &RunnerSnapshot) {
    let _ = app_handle.emit("runner-state-changed", Some(snapshot.clone()));
}
