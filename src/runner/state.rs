use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::Drill;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    Rest,
}

/// What a single one-second tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Countdown decremented, nothing else happened.
    Ticked,
    /// A work phase finished. The caller owes a log record for `drill`
    /// with the drill's planned duration.
    WorkCompleted { drill: Drill, finished: bool },
    /// A rest phase finished; the runner moved to the next work phase.
    RestCompleted,
}

/// State machine for a runthrough: an ordered queue of drills, each run as
/// a work phase of `default_minutes`, separated by fixed rest phases.
///
/// The state only changes inside `tick()`, driven by an external
/// once-per-second clock, so every transition is observable between ticks.
/// Invariant: `current_index < queue.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerState {
    pub queue: Vec<Drill>,
    pub current_index: usize,
    pub phase: Phase,
    /// Seconds left in the current phase.
    pub time_remaining: u32,
    pub is_active: bool,
    pub rest_seconds: u32,
    pub finished: bool,
}

impl RunnerState {
    pub fn new(queue: Vec<Drill>, rest_seconds: u32) -> Result<Self> {
        let Some(first) = queue.first() else {
            bail!("runthrough queue must not be empty");
        };
        if queue.iter().any(|drill| drill.default_minutes == 0) {
            bail!("every drill in the queue needs a positive duration");
        }

        Ok(Self {
            time_remaining: first.default_minutes * 60,
            queue,
            current_index: 0,
            phase: Phase::Work,
            is_active: false,
            rest_seconds,
            finished: false,
        })
    }

    pub fn current_drill(&self) -> &Drill {
        &self.queue[self.current_index]
    }

    /// Force the current phase to its end. The transition itself runs on
    /// the next tick, exactly as if the countdown had expired naturally.
    pub fn skip(&mut self) {
        if !self.finished {
            self.time_remaining = 0;
        }
    }

    /// Advance the clock by one second. Returns `None` while the runner is
    /// paused or finished; otherwise reports what the tick did.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.is_active || self.finished {
            return None;
        }

        if self.time_remaining > 0 {
            self.time_remaining -= 1;
            if self.time_remaining > 0 {
                return Some(TickOutcome::Ticked);
            }
        }

        Some(self.advance_phase())
    }

    fn advance_phase(&mut self) -> TickOutcome {
        match self.phase {
            Phase::Work => {
                let drill = self.queue[self.current_index].clone();
                if self.current_index + 1 < self.queue.len() {
                    self.phase = Phase::Rest;
                    self.time_remaining = self.rest_seconds;
                    TickOutcome::WorkCompleted {
                        drill,
                        finished: false,
                    }
                } else {
                    self.finished = true;
                    self.is_active = false;
                    TickOutcome::WorkCompleted {
                        drill,
                        finished: true,
                    }
                }
            }
            Phase::Rest => {
                self.current_index += 1;
                self.phase = Phase::Work;
                self.time_remaining = self.queue[self.current_index].default_minutes * 60;
                TickOutcome::RestCompleted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn drill(name: &str, minutes: u32) -> Drill {
        let now = Utc::now();
        Drill {
            id: name.to_lowercase(),
            name: name.to_string(),
            default_minutes: minutes,
            category: Category::SelfTraining,
            created_at: now,
            updated_at: now,
        }
    }

    fn running_state(queue: Vec<Drill>, rest_seconds: u32) -> RunnerState {
        let mut state = RunnerState::new(queue, rest_seconds).unwrap();
        state.is_active = true;
        state
    }

    #[test]
    fn empty_queue_is_rejected() {
        assert!(RunnerState::new(Vec::new(), 30).is_err());
    }

    #[test]
    fn paused_runner_does_not_tick() {
        let mut state = RunnerState::new(vec![drill("A", 1)], 30).unwrap();
        assert_eq!(state.tick(), None);
        assert_eq!(state.time_remaining, 60);
    }

    #[test]
    fn countdown_decrements_by_one_and_never_goes_negative() {
        let mut state = running_state(vec![drill("A", 1)], 30);
        let mut previous = state.time_remaining;
        while !state.finished {
            state.tick();
            assert!(state.time_remaining < previous || state.finished);
            if !state.finished {
                assert_eq!(previous - state.time_remaining, 1);
            }
            previous = state.time_remaining;
        }
    }

    #[test]
    fn full_run_produces_n_logs_and_n_minus_one_rests() {
        let queue = vec![drill("A", 1), drill("B", 1), drill("C", 2)];
        let mut state = running_state(queue, 5);

        let mut work_completions = 0;
        let mut rest_completions = 0;
        for _ in 0..10_000 {
            match state.tick() {
                Some(TickOutcome::WorkCompleted { .. }) => work_completions += 1,
                Some(TickOutcome::RestCompleted) => rest_completions += 1,
                Some(TickOutcome::Ticked) => {}
                None => break,
            }
        }

        assert_eq!(work_completions, 3);
        assert_eq!(rest_completions, 2);
        assert!(state.finished);
        assert!(!state.is_active);
    }

    #[test]
    fn two_drill_run_matches_expected_sequence() {
        // queue = [A 1m, B 1m], rest 5s: Work(0) 60..0, log A, Rest 5..0,
        // Work(1) 60..0, log B, finished.
        let mut state = running_state(vec![drill("A", 1), drill("B", 1)], 5);
        assert_eq!(state.time_remaining, 60);

        for expected in (1..60).rev() {
            assert_eq!(state.tick(), Some(TickOutcome::Ticked));
            assert_eq!(state.time_remaining, expected);
        }

        // The tick that reaches zero completes the work phase.
        match state.tick() {
            Some(TickOutcome::WorkCompleted { drill, finished }) => {
                assert_eq!(drill.name, "A");
                assert_eq!(drill.default_minutes, 1);
                assert!(!finished);
            }
            other => panic!("expected work completion, got {other:?}"),
        }
        assert_eq!(state.phase, Phase::Rest);
        assert_eq!(state.time_remaining, 5);

        for _ in 0..4 {
            assert_eq!(state.tick(), Some(TickOutcome::Ticked));
        }
        assert_eq!(state.tick(), Some(TickOutcome::RestCompleted));
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.current_index, 1);
        assert_eq!(state.time_remaining, 60);

        for _ in 0..59 {
            assert_eq!(state.tick(), Some(TickOutcome::Ticked));
        }
        match state.tick() {
            Some(TickOutcome::WorkCompleted { drill, finished }) => {
                assert_eq!(drill.name, "B");
                assert!(finished);
            }
            other => panic!("expected final work completion, got {other:?}"),
        }
        assert!(state.finished);
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn skip_completes_phase_with_planned_duration() {
        let mut state = running_state(vec![drill("A", 15), drill("B", 10)], 30);
        state.tick();
        state.skip();
        assert_eq!(state.time_remaining, 0);

        match state.tick() {
            Some(TickOutcome::WorkCompleted { drill, .. }) => {
                // The log still carries the planned duration, not elapsed.
                assert_eq!(drill.default_minutes, 15);
            }
            other => panic!("expected work completion, got {other:?}"),
        }
        assert_eq!(state.phase, Phase::Rest);
    }

    #[test]
    fn zero_rest_moves_straight_to_next_work_phase() {
        let mut state = running_state(vec![drill("A", 1), drill("B", 1)], 0);
        state.skip();
        assert!(matches!(
            state.tick(),
            Some(TickOutcome::WorkCompleted { .. })
        ));
        // Rest of zero seconds: the next tick transitions immediately.
        assert_eq!(state.tick(), Some(TickOutcome::RestCompleted));
        assert_eq!(state.current_index, 1);
    }
}
