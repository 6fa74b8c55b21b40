//! One study session's timer: engine, ticker, clock and repository.
//!
//! Everything the timer needs is injected here, so there is no process-wide
//! engine. Commands go through [`PomodoroSession::execute`], which keeps the
//! ticker in step with the state and persists a snapshot afterwards.

use std::sync::Arc;
use tracing::debug;

use super::commands::{CommandKind, PomodoroCommand, ResetCommand};
use super::engine::{lock_engine, PomodoroEngine, PomodoroSnapshot, SharedEngine};
use super::observer::{PomodoroObserver, Subscription};
use super::phase::PomodoroSettings;
use super::state::TimerState;
use super::ticker::{Clock, Ticker};
use crate::error::TransitionError;
use crate::storage::PomodoroRepository;

pub struct PomodoroSession {
    engine: SharedEngine,
    ticker: Ticker,
    clock: Box<dyn Clock>,
    repository: Box<dyn PomodoroRepository>,
    last_reset: Option<ResetCommand>,
}

impl PomodoroSession {
    pub fn new(
        settings: PomodoroSettings,
        clock: Box<dyn Clock>,
        repository: Box<dyn PomodoroRepository>,
    ) -> Self {
        Self::from_engine(PomodoroEngine::new(settings), clock, repository)
    }

    /// Pick up where the repository left off, or start fresh when it holds
    /// nothing usable. A restored `RUNNING` timer does not tick until
    /// [`start_ticking`](Self::start_ticking) is called.
    pub fn resume_or_new(
        settings: PomodoroSettings,
        clock: Box<dyn Clock>,
        repository: Box<dyn PomodoroRepository>,
    ) -> Self {
        let engine = match repository.load() {
            Some(snapshot) => {
                debug!(state = %snapshot.state, "restoring pomodoro snapshot");
                PomodoroEngine::restore(settings, &snapshot)
            }
            None => PomodoroEngine::new(settings),
        };
        Self::from_engine(engine, clock, repository)
    }

    fn from_engine(
        engine: PomodoroEngine,
        clock: Box<dyn Clock>,
        repository: Box<dyn PomodoroRepository>,
    ) -> Self {
        Self {
            engine: engine.into_shared(),
            ticker: Ticker::new(),
            clock,
            repository,
            last_reset: None,
        }
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn state(&self) -> TimerState {
        lock_engine(&self.engine).state()
    }

    pub fn snapshot(&self) -> PomodoroSnapshot {
        lock_engine(&self.engine).snapshot()
    }

    pub fn subscribe(&self, observer: Arc<dyn PomodoroObserver>) -> Subscription {
        lock_engine(&self.engine).subscribe(observer)
    }

    /// Run one command, then start or stop ticking to match the new state
    /// and save a snapshot. A rejected command changes nothing.
    pub fn execute(&mut self, kind: CommandKind) -> Result<(), TransitionError> {
        match kind {
            CommandKind::Reset => {
                let mut reset = ResetCommand::new(&self.engine);
                reset.execute()?;
                self.last_reset = Some(reset);
            }
            other => other.bind(&self.engine).execute()?,
        }

        match self.state() {
            TimerState::Running if !self.is_ticking() => self.start_ticking(),
            TimerState::Running => {}
            TimerState::Idle | TimerState::Paused => self.stop_ticking(),
        }
        self.save();
        Ok(())
    }

    /// Undo the most recent reset. Returns false when there is none.
    pub fn undo_reset(&mut self) -> bool {
        match self.last_reset.take() {
            Some(mut reset) => {
                reset.undo();
                self.save();
                true
            }
            None => false,
        }
    }

    pub fn start_ticking(&mut self) {
        self.ticker.start(&self.engine, self.clock.as_ref());
    }

    pub fn stop_ticking(&mut self) {
        self.ticker.stop();
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_ticking()
    }

    pub fn save(&self) {
        let snapshot = self.snapshot();
        self.repository.save(&snapshot);
    }

    /// Save the current state as it stood at `timestamp`, so time not yet
    /// counted is still owed on the next load.
    pub fn save_at(&self, timestamp: u64) {
        let snapshot = self.snapshot();
        self.repository.save_at(&snapshot, timestamp);
    }

    pub fn clear(&self) {
        self.repository.clear();
    }
}
