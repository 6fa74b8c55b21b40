//! Pomodoro engine implementation.
//!
//! The engine holds the timer's data and delegates every mutating operation
//! to its current [`TimerState`]. It does not use internal threads: one
//! second of countdown happens per `tick()`, driven either by the caller or
//! by a [`Ticker`](super::Ticker).
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(PomodoroSettings::default());
//! engine.subscribe(observer);
//! engine.start()?;
//! // Once per second:
//! engine.tick();
//! ```

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::observer::{ObserverRegistry, PomodoroObserver, Subscription};
use super::phase::{PomodoroPhase, PomodoroSettings, SettingsPatch};
use super::state::TimerState;
use crate::error::{TransitionError, ValidationError};

/// An engine shared between its owner and a ticker.
pub type SharedEngine = Arc<Mutex<PomodoroEngine>>;

/// Lock a shared engine. A panic inside an observer must not brick the timer,
/// so poisoning is ignored.
pub fn lock_engine(engine: &SharedEngine) -> MutexGuard<'_, PomodoroEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serializable hand-off to a persistence repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSnapshot {
    pub phase: PomodoroPhase,
    pub remaining_time: u64,
    pub completed_sessions: u32,
    /// State name (`IDLE`, `RUNNING`, `PAUSED`).
    pub state: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Core pomodoro engine.
#[derive(Debug)]
pub struct PomodoroEngine {
    state: TimerState,
    phase: PomodoroPhase,
    /// Seconds left in the current phase.
    remaining_time: u64,
    completed_sessions: u32,
    settings: PomodoroSettings,
    observers: ObserverRegistry,
}

impl PomodoroEngine {
    /// Create an engine in `Idle`, with the work countdown loaded.
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            state: TimerState::Idle,
            phase: PomodoroPhase::Work,
            remaining_time: settings.duration_secs(PomodoroPhase::Work),
            completed_sessions: 0,
            settings,
            observers: ObserverRegistry::new(),
        }
    }

    /// Rebuild an engine from a persisted snapshot. Unknown state names
    /// restore as `Idle`. No observers are notified.
    pub fn restore(settings: PomodoroSettings, snapshot: &PomodoroSnapshot) -> Self {
        Self {
            state: TimerState::from_name(&snapshot.state).unwrap_or(TimerState::Idle),
            phase: snapshot.phase,
            remaining_time: snapshot.remaining_time,
            completed_sessions: snapshot.completed_sessions,
            settings,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    pub fn snapshot(&self) -> PomodoroSnapshot {
        PomodoroSnapshot {
            phase: self.phase,
            remaining_time: self.remaining_time,
            completed_sessions: self.completed_sessions,
            state: self.state.name().to_string(),
            timestamp: now_ms(),
        }
    }

    // ── Context mutators (used by the state variants) ────────────────

    pub fn set_state(&mut self, state: TimerState) {
        debug!(from = %self.state, to = %state, "timer state change");
        self.state = state;
        self.notify_observers();
    }

    /// Replace the phase. A real change reports the phase that just ended.
    pub fn set_phase(&mut self, phase: PomodoroPhase) {
        let old = self.phase;
        self.phase = phase;
        if old != phase {
            self.observers.for_each(|o| o.on_phase_complete(old));
        }
    }

    pub fn set_remaining_time(&mut self, seconds: u64) {
        self.remaining_time = seconds;
    }

    pub fn increment_completed_sessions(&mut self) {
        self.completed_sessions += 1;
        let count = self.completed_sessions;
        debug!(count, "pomodoro session completed");
        self.observers.for_each(|o| o.on_session_complete(count));
    }

    pub fn reset_completed_sessions(&mut self) {
        self.completed_sessions = 0;
    }

    /// Shallow-merge `patch` into the settings. The countdown in progress is
    /// left alone; new durations apply from the next phase.
    ///
    /// # Errors
    /// Rejects a patch that would make any value zero; settings are unchanged.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<(), ValidationError> {
        let merged = self.settings.merged(patch);
        merged.validate()?;
        self.settings = merged;
        Ok(())
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe(&self, observer: Arc<dyn PomodoroObserver>) -> Subscription {
        self.observers.subscribe(observer)
    }

    pub fn notify_observers(&self) {
        let name = self.state.name();
        let (phase, remaining) = (self.phase, self.remaining_time);
        self.observers
            .for_each(|o| o.on_state_change(name, phase, remaining));
    }

    // ── Operations (delegated to the current state) ──────────────────

    pub fn start(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.start(self)
    }

    pub fn pause(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.pause(self)
    }

    pub fn resume(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.resume(self)
    }

    pub fn reset(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.reset(self)
    }

    pub fn skip(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.skip(self)
    }

    pub fn tick(&mut self) {
        let state = self.state;
        state.tick(self)
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
