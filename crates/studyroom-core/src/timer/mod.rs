mod commands;
mod engine;
mod observer;
mod phase;
mod session;
mod state;
mod ticker;

pub use commands::{
    CommandKind, PauseCommand, PomodoroCommand, ResetCommand, ResumeCommand, SkipCommand,
    StartCommand,
};
pub use engine::{lock_engine, PomodoroEngine, PomodoroSnapshot, SharedEngine};
pub(crate) use engine::now_ms;
pub use observer::{ObserverRegistry, PomodoroObserver, Subscription};
pub use phase::{format_remaining, PomodoroPhase, PomodoroSettings, SettingsPatch};
pub use session::PomodoroSession;
pub use state::TimerState;
pub use ticker::{Clock, ManualClock, Pulse, PulseHandle, Ticker, TokioClock};
