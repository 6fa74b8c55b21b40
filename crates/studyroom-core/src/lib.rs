//! # Studyroom Core Library
//!
//! The stateful core of a study portal: a pomodoro timer, quizzes and study
//! plans. Everything is usable from the `studyroom-cli` binary, which is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a closed-enum state machine driven by `tick()`, with command
//!   objects, observers and a pluggable clock for live ticking
//! - **Quiz**: answer-taking state machine and question generation with
//!   AI-first, heuristic-fallback strategies
//! - **Study plan**: topic distribution strategies and plan history
//! - **Storage**: SQLite persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: core timer state machine
//! - [`PomodoroSession`]: engine, ticker and repository for one owner
//! - [`Quiz`]: quiz state machine
//! - [`QuestionGenerator`]: ordered-fallback question generation
//! - [`StudyPlanGenerator`]: study plan construction
//! - [`Database`] / [`Config`]: persistence and configuration

pub mod error;
pub mod quiz;
pub mod storage;
pub mod study_plan;
pub mod timer;

pub use error::{
    ConfigError, CoreError, DatabaseError, GenerationError, Result, TransitionError,
    ValidationError,
};
pub use quiz::{Question, QuestionGenerator, QuestionType, Quiz, QuizData, QuizState};
pub use storage::{Config, Database, PomodoroRepository, StudyPlanRepository};
pub use study_plan::{StudyPlan, StudyPlanGenerator, StudyStrategyType};
pub use timer::{
    CommandKind, PomodoroEngine, PomodoroPhase, PomodoroSession, PomodoroSettings, TimerState,
};
