use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use serde_json::json;
use studyroom_core::storage::{Database, PomodoroRepository, SqlitePomodoroRepository};
use studyroom_core::timer::{
    format_remaining, lock_engine, Clock, CommandKind, ManualClock, PomodoroObserver, PomodoroPhase,
    PomodoroSession, Ticker, TimerState, TokioClock,
};
use studyroom_core::Config;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a work phase from idle
    Start,
    /// Pause the running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Back to idle, clearing completed sessions
    Reset,
    /// Finish the current phase now
    Skip,
    /// Print current timer state as JSON
    Status,
    /// Tick in the foreground, printing one JSON line per event
    Run {
        /// Stop after this many seconds (default: the rest of the phase)
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Forget the saved timer state
    Clear,
}

/// Prints every engine notification as a JSON line.
struct JsonLines;

impl PomodoroObserver for JsonLines {
    fn on_state_change(&self, state: &str, phase: PomodoroPhase, remaining_time: u64) {
        println!(
            "{}",
            json!({
                "event": "state",
                "state": state,
                "phase": phase,
                "label": phase.label(),
                "remainingTime": remaining_time,
                "display": format_remaining(remaining_time),
            })
        );
    }

    fn on_phase_complete(&self, phase: PomodoroPhase) {
        println!("{}", json!({ "event": "phaseComplete", "phase": phase }));
    }

    fn on_session_complete(&self, sessions_completed: u32) {
        println!(
            "{}",
            json!({ "event": "sessionComplete", "completedSessions": sessions_completed })
        );
    }
}

/// Restore the saved session, replaying the whole seconds that passed since
/// it was saved if it was running. The replayed state is saved as of the
/// last replayed second, so the leftover fraction carries over.
fn open_session(clock: Box<dyn Clock>) -> Result<PomodoroSession, Box<dyn std::error::Error>> {
    let settings = Config::load()?.pomodoro_settings()?;
    let repository = SqlitePomodoroRepository::new(Database::open()?);

    let replay_from = repository
        .load()
        .filter(|saved| saved.state == TimerState::Running.name())
        .map(|saved| {
            let now = Utc::now().timestamp_millis().max(0) as u64;
            (saved.timestamp, now.saturating_sub(saved.timestamp) / 1000)
        });

    let mut session = PomodoroSession::resume_or_new(settings, clock, Box::new(repository));
    if let Some((saved_at, elapsed)) = replay_from.filter(|&(_, elapsed)| elapsed > 0) {
        let replay = ManualClock::new();
        let mut ticker = Ticker::new();
        ticker.start(session.engine(), &replay);
        replay.advance(elapsed as usize);
        ticker.stop();
        session.save_at(saved_at + elapsed * 1000);
    }
    Ok(session)
}

fn print_status(session: &PomodoroSession) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let command = match action {
        TimerAction::Start => CommandKind::Start,
        TimerAction::Pause => CommandKind::Pause,
        TimerAction::Resume => CommandKind::Resume,
        TimerAction::Reset => CommandKind::Reset,
        TimerAction::Skip => CommandKind::Skip,
        TimerAction::Status => {
            let session = open_session(Box::new(ManualClock::new()))?;
            return print_status(&session);
        }
        TimerAction::Clear => {
            let session = open_session(Box::new(ManualClock::new()))?;
            session.clear();
            println!("timer state cleared");
            return Ok(());
        }
        TimerAction::Run { seconds } => return run_foreground(seconds),
    };

    let mut session = open_session(Box::new(ManualClock::new()))?;
    session.execute(command)?;
    session.stop_ticking();
    print_status(&session)
}

fn run_foreground(seconds: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async {
        let mut session = open_session(Box::new(TokioClock::current()))?;
        session.subscribe(Arc::new(JsonLines));

        match session.state() {
            TimerState::Idle => session.execute(CommandKind::Start)?,
            TimerState::Paused => session.execute(CommandKind::Resume)?,
            TimerState::Running => session.start_ticking(),
        }

        let seconds =
            seconds.unwrap_or_else(|| lock_engine(session.engine()).remaining_time() + 1);
        tokio::time::sleep(Duration::from_secs(seconds)).await;

        session.stop_ticking();
        session.save();
        Ok::<_, Box<dyn std::error::Error>>(())
    })?;
    Ok(())
}
