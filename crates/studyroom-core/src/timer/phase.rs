use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    /// Wire name, as stored in snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "WORK",
            PomodoroPhase::ShortBreak => "SHORT_BREAK",
            PomodoroPhase::LongBreak => "LONG_BREAK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Work => "Focus",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for PomodoroPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durations are in minutes; all four values are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub sessions_until_long_break: u32,
}

impl PomodoroSettings {
    /// Build validated settings.
    ///
    /// # Errors
    /// Returns [`ValidationError::NotPositive`] naming the first zero field.
    pub fn new(
        work_duration: u32,
        short_break_duration: u32,
        long_break_duration: u32,
        sessions_until_long_break: u32,
    ) -> Result<Self, ValidationError> {
        let settings = Self {
            work_duration,
            short_break_duration,
            long_break_duration,
            sessions_until_long_break,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("workDuration", self.work_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("sessionsUntilLongBreak", self.sessions_until_long_break),
        ];
        match fields.iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ValidationError::NotPositive { field: *field }),
            None => Ok(()),
        }
    }

    /// Countdown length of `phase` in seconds.
    pub fn duration_secs(&self, phase: PomodoroPhase) -> u64 {
        let minutes = match phase {
            PomodoroPhase::Work => self.work_duration,
            PomodoroPhase::ShortBreak => self.short_break_duration,
            PomodoroPhase::LongBreak => self.long_break_duration,
        };
        u64::from(minutes).saturating_mul(60)
    }

    /// Shallow merge: fields present in `patch` replace ours.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch
                .long_break_duration
                .unwrap_or(self.long_break_duration),
            sessions_until_long_break: patch
                .sessions_until_long_break
                .unwrap_or(self.sessions_until_long_break),
        }
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
        }
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub work_duration: Option<u32>,
    #[serde(default)]
    pub short_break_duration: Option<u32>,
    #[serde(default)]
    pub long_break_duration: Option<u32>,
    #[serde(default)]
    pub sessions_until_long_break: Option<u32>,
}

/// `MM:SS` rendering of a countdown.
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
