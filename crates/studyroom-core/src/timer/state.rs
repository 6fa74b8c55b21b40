//! Timer state variants and their transition rules.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!  ^                 |                  |
//!  +------reset------+------reset-------+
//! ```
//!
//! `skip` and a `tick` at zero complete the current phase. Skipping while
//! paused goes through `Running` first, so the timer keeps counting down the
//! next phase.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::PomodoroEngine;
use super::phase::PomodoroPhase;
use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

impl TimerState {
    pub fn name(&self) -> &'static str {
        match self {
            TimerState::Idle => "IDLE",
            TimerState::Running => "RUNNING",
            TimerState::Paused => "PAUSED",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "IDLE" => Some(TimerState::Idle),
            "RUNNING" => Some(TimerState::Running),
            "PAUSED" => Some(TimerState::Paused),
            _ => None,
        }
    }

    pub fn start(self, engine: &mut PomodoroEngine) -> Result<(), TransitionError> {
        match self {
            TimerState::Idle => {
                let work = engine.settings().duration_secs(PomodoroPhase::Work);
                engine.set_remaining_time(work);
                engine.set_phase(PomodoroPhase::Work);
                engine.set_state(TimerState::Running);
                Ok(())
            }
            TimerState::Running => Err(TransitionError::TimerAlreadyRunning),
            TimerState::Paused => Err(TransitionError::TimerAlreadyStarted),
        }
    }

    pub fn pause(self, engine: &mut PomodoroEngine) -> Result<(), TransitionError> {
        match self {
            TimerState::Idle => Err(TransitionError::PauseWhenIdle),
            TimerState::Running => {
                engine.set_state(TimerState::Paused);
                Ok(())
            }
            TimerState::Paused => Ok(()),
        }
    }

    pub fn resume(self, engine: &mut PomodoroEngine) -> Result<(), TransitionError> {
        match self {
            TimerState::Idle => Err(TransitionError::ResumeWhenIdle),
            TimerState::Running => Err(TransitionError::TimerAlreadyRunning),
            TimerState::Paused => {
                engine.set_state(TimerState::Running);
                Ok(())
            }
        }
    }

    /// Always legal. Restores the work countdown and clears the session count.
    pub fn reset(self, engine: &mut PomodoroEngine) -> Result<(), TransitionError> {
        let work = engine.settings().duration_secs(PomodoroPhase::Work);
        engine.set_phase(PomodoroPhase::Work);
        engine.set_remaining_time(work);
        engine.reset_completed_sessions();
        if self != TimerState::Idle {
            engine.set_state(TimerState::Idle);
        }
        Ok(())
    }

    pub fn skip(self, engine: &mut PomodoroEngine) -> Result<(), TransitionError> {
        match self {
            TimerState::Idle => Err(TransitionError::SkipWhenIdle),
            TimerState::Running => {
                complete_phase(engine);
                Ok(())
            }
            TimerState::Paused => {
                engine.set_state(TimerState::Running);
                complete_phase(engine);
                Ok(())
            }
        }
    }

    /// One second of countdown. Only `Running` does anything.
    pub fn tick(self, engine: &mut PomodoroEngine) {
        if self != TimerState::Running {
            return;
        }
        let remaining = engine.remaining_time();
        if remaining == 0 {
            complete_phase(engine);
        } else {
            engine.set_remaining_time(remaining - 1);
            engine.notify_observers();
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finish the current phase and load the next one.
///
/// The long-break decision uses the session count after the increment, so
/// the Nth, 2Nth, ... work phase is followed by a long break.
fn complete_phase(engine: &mut PomodoroEngine) {
    let settings = *engine.settings();
    match engine.phase() {
        PomodoroPhase::Work => {
            engine.increment_completed_sessions();
            // A zero cadence never earns a long break.
            let cadence = settings.sessions_until_long_break;
            let next = if engine.completed_sessions().checked_rem(cadence) == Some(0) {
                PomodoroPhase::LongBreak
            } else {
                PomodoroPhase::ShortBreak
            };
            engine.set_phase(next);
            engine.set_remaining_time(settings.duration_secs(next));
        }
        PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => {
            engine.set_phase(PomodoroPhase::Work);
            engine.set_remaining_time(settings.duration_secs(PomodoroPhase::Work));
        }
    }
    engine.notify_observers();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::PomodoroSettings;

    fn engine() -> PomodoroEngine {
        PomodoroEngine::new(PomodoroSettings::default())
    }

    #[test]
    fn names_round_trip() {
        for state in [TimerState::Idle, TimerState::Running, TimerState::Paused] {
            assert_eq!(TimerState::from_name(state.name()), Some(state));
        }
        assert_eq!(TimerState::from_name("DRIFTING"), None);
    }

    #[test]
    fn idle_rejects_pause_resume_skip() {
        let mut e = engine();
        assert_eq!(
            TimerState::Idle.pause(&mut e),
            Err(TransitionError::PauseWhenIdle)
        );
        assert_eq!(
            TimerState::Idle.resume(&mut e),
            Err(TransitionError::ResumeWhenIdle)
        );
        assert_eq!(
            TimerState::Idle.skip(&mut e),
            Err(TransitionError::SkipWhenIdle)
        );
        assert_eq!(e.state(), TimerState::Idle);
    }

    #[test]
    fn running_and_paused_reject_start() {
        let mut e = engine();
        e.start().unwrap();
        assert_eq!(e.start(), Err(TransitionError::TimerAlreadyRunning));
        assert_eq!(e.resume(), Err(TransitionError::TimerAlreadyRunning));
        e.pause().unwrap();
        assert_eq!(e.start(), Err(TransitionError::TimerAlreadyStarted));
    }

    #[test]
    fn pause_while_paused_is_noop() {
        let mut e = engine();
        e.start().unwrap();
        e.pause().unwrap();
        e.pause().unwrap();
        assert_eq!(e.state(), TimerState::Paused);
    }

    #[test]
    fn tick_is_noop_unless_running() {
        let mut e = engine();
        e.tick();
        assert_eq!(e.remaining_time(), 1500);
        e.start().unwrap();
        e.pause().unwrap();
        e.tick();
        assert_eq!(e.remaining_time(), 1500);
    }

    #[test]
    fn idle_reset_restores_defaults_without_leaving_idle() {
        let mut e = engine();
        e.set_remaining_time(12);
        e.set_phase(PomodoroPhase::LongBreak);
        TimerState::Idle.reset(&mut e).unwrap();
        assert_eq!(e.state(), TimerState::Idle);
        assert_eq!(e.phase(), PomodoroPhase::Work);
        assert_eq!(e.remaining_time(), 1500);
    }

    #[test]
    fn skip_while_paused_resumes_and_completes() {
        let mut e = engine();
        e.start().unwrap();
        e.pause().unwrap();
        e.skip().unwrap();
        assert_eq!(e.state(), TimerState::Running);
        assert_eq!(e.phase(), PomodoroPhase::ShortBreak);
        assert_eq!(e.remaining_time(), 300);
        assert_eq!(e.completed_sessions(), 1);
    }

    #[test]
    fn break_completion_returns_to_work_without_counting() {
        let mut e = engine();
        e.start().unwrap();
        e.skip().unwrap();
        assert_eq!(e.completed_sessions(), 1);
        e.skip().unwrap();
        assert_eq!(e.phase(), PomodoroPhase::Work);
        assert_eq!(e.remaining_time(), 1500);
        assert_eq!(e.completed_sessions(), 1);
    }

    #[test]
    fn zero_cadence_always_takes_a_short_break() {
        let settings = PomodoroSettings {
            sessions_until_long_break: 0,
            ..PomodoroSettings::default()
        };
        let mut e = PomodoroEngine::new(settings);
        e.start().unwrap();
        for _ in 0..3 {
            e.skip().unwrap();
            assert_eq!(e.phase(), PomodoroPhase::ShortBreak);
            e.skip().unwrap();
        }
        assert_eq!(e.completed_sessions(), 3);
    }
}
