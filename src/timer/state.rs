use serde::{Deserialize, Serialize};

use crate::models::Drill;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTick {
    Ticked,
    Finished,
}

/// Countdown for a single drill.
///
/// Same tick discipline as the runthrough runner, restricted to one item
/// and with no rest phase. Reaching zero stops the clock and marks the
/// timer finished; nothing is logged until the user explicitly confirms,
/// unlike the runthrough which logs each phase automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub drill: Drill,
    pub time_remaining: u32,
    pub is_active: bool,
    pub finished: bool,
}

impl TimerState {
    pub fn new(drill: Drill) -> Self {
        Self {
            time_remaining: drill.default_minutes * 60,
            drill,
            is_active: false,
            finished: false,
        }
    }

    pub fn tick(&mut self) -> Option<TimerTick> {
        if !self.is_active || self.finished {
            return None;
        }

        if self.time_remaining > 0 {
            self.time_remaining -= 1;
        }

        if self.time_remaining == 0 {
            self.finished = true;
            self.is_active = false;
            Some(TimerTick::Finished)
        } else {
            Some(TimerTick::Ticked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::Utc;

    fn drill(minutes: u32) -> Drill {
        let now = Utc::now();
        Drill {
            id: "d1".into(),
            name: "Circle Shooting".into(),
            default_minutes: minutes,
            category: Category::SelfTraining,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn counts_down_then_finishes_without_logging() {
        let mut state = TimerState::new(drill(1));
        state.is_active = true;

        for _ in 0..59 {
            assert_eq!(state.tick(), Some(TimerTick::Ticked));
        }
        assert_eq!(state.tick(), Some(TimerTick::Finished));
        assert!(state.finished);
        assert!(!state.is_active);
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn inactive_timer_holds_its_value() {
        let mut state = TimerState::new(drill(10));
        assert_eq!(state.tick(), None);
        assert_eq!(state.time_remaining, 600);
    }
}
