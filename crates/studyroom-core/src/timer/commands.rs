//! Command objects over a shared engine.
//!
//! Each command is bound to one engine at construction and forwards to the
//! matching operation of the engine's current state. Failures come back as
//! the state's [`TransitionError`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::engine::{lock_engine, SharedEngine};
use super::phase::PomodoroPhase;
use crate::error::TransitionError;

pub trait PomodoroCommand {
    fn name(&self) -> &'static str;

    fn execute(&mut self) -> Result<(), TransitionError>;

    /// Revert the last `execute`. Most commands cannot.
    fn undo(&mut self) {}
}

pub struct StartCommand {
    engine: SharedEngine,
}

impl StartCommand {
    pub fn new(engine: &SharedEngine) -> Self {
        Self {
            engine: SharedEngine::clone(engine),
        }
    }
}

impl PomodoroCommand for StartCommand {
    fn name(&self) -> &'static str {
        "start"
    }

    fn execute(&mut self) -> Result<(), TransitionError> {
        let mut engine = lock_engine(&self.engine);
        let state = engine.state();
        state.start(&mut engine)
    }
}

pub struct PauseCommand {
    engine: SharedEngine,
}

impl PauseCommand {
    pub fn new(engine: &SharedEngine) -> Self {
        Self {
            engine: SharedEngine::clone(engine),
        }
    }
}

impl PomodoroCommand for PauseCommand {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn execute(&mut self) -> Result<(), TransitionError> {
        let mut engine = lock_engine(&self.engine);
        let state = engine.state();
        state.pause(&mut engine)
    }
}

pub struct ResumeCommand {
    engine: SharedEngine,
}

impl ResumeCommand {
    pub fn new(engine: &SharedEngine) -> Self {
        Self {
            engine: SharedEngine::clone(engine),
        }
    }
}

impl PomodoroCommand for ResumeCommand {
    fn name(&self) -> &'static str {
        "resume"
    }

    fn execute(&mut self) -> Result<(), TransitionError> {
        let mut engine = lock_engine(&self.engine);
        let state = engine.state();
        state.resume(&mut engine)
    }
}

pub struct SkipCommand {
    engine: SharedEngine,
}

impl SkipCommand {
    pub fn new(engine: &SharedEngine) -> Self {
        Self {
            engine: SharedEngine::clone(engine),
        }
    }
}

impl PomodoroCommand for SkipCommand {
    fn name(&self) -> &'static str {
        "skip"
    }

    fn execute(&mut self) -> Result<(), TransitionError> {
        let mut engine = lock_engine(&self.engine);
        let state = engine.state();
        state.skip(&mut engine)
    }
}

/// What a reset overwrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BeforeReset {
    remaining_time: u64,
    phase: PomodoroPhase,
}

/// Reset with undo.
///
/// `undo` writes the captured remaining time and phase straight back onto
/// the engine. It is a field restore, not a state transition: the timer
/// stays in whatever state the reset left it in.
pub struct ResetCommand {
    engine: SharedEngine,
    previous: Option<BeforeReset>,
}

impl ResetCommand {
    pub fn new(engine: &SharedEngine) -> Self {
        Self {
            engine: SharedEngine::clone(engine),
            previous: None,
        }
    }
}

impl PomodoroCommand for ResetCommand {
    fn name(&self) -> &'static str {
        "reset"
    }

    fn execute(&mut self) -> Result<(), TransitionError> {
        let mut engine = lock_engine(&self.engine);
        self.previous = Some(BeforeReset {
            remaining_time: engine.remaining_time(),
            phase: engine.phase(),
        });
        let state = engine.state();
        state.reset(&mut engine)
    }

    fn undo(&mut self) {
        if let Some(previous) = self.previous {
            let mut engine = lock_engine(&self.engine);
            engine.set_remaining_time(previous.remaining_time);
            engine.set_phase(previous.phase);
        }
    }
}

/// The five timer operations, for callers that pick one at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Start,
    Pause,
    Resume,
    Reset,
    Skip,
}

impl CommandKind {
    pub fn bind(self, engine: &SharedEngine) -> Box<dyn PomodoroCommand> {
        match self {
            CommandKind::Start => Box::new(StartCommand::new(engine)),
            CommandKind::Pause => Box::new(PauseCommand::new(engine)),
            CommandKind::Resume => Box::new(ResumeCommand::new(engine)),
            CommandKind::Reset => Box::new(ResetCommand::new(engine)),
            CommandKind::Skip => Box::new(SkipCommand::new(engine)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Start => "start",
            CommandKind::Pause => "pause",
            CommandKind::Resume => "resume",
            CommandKind::Reset => "reset",
            CommandKind::Skip => "skip",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
