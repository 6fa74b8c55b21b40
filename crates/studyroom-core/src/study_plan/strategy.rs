//! Plan distribution strategies.
//!
//! | Strategy  | Hours/day | Max session | Break every |
//! |-----------|-----------|-------------|-------------|
//! | Intensive | 8         | 3 h         | 50 min      |
//! | Regular   | 4         | 2 h         | 45 min      |
//! | Light     | 2         | 1 h         | 30 min      |

use chrono::{DateTime, Duration, Utc};

use super::types::{StudySession, StudyStrategyType, StudyTopic};

/// Hours below this are treated as done.
const HOURS_EPSILON: f64 = 1e-9;

pub trait StudyPlanStrategy: Send + Sync {
    fn kind(&self) -> StudyStrategyType;

    fn daily_hours(&self) -> f64;

    fn max_session_hours(&self) -> f64;

    /// Recommended minutes of study between breaks.
    fn break_frequency_minutes(&self) -> u32;

    /// Highest priority first, then shortest first. Stable for ties.
    fn prioritize_topics(&self, topics: &[StudyTopic]) -> Vec<StudyTopic> {
        let mut sorted = topics.to_vec();
        sorted.sort_by(|a, b| {
            b.priority
                .weight()
                .cmp(&a.priority.weight())
                .then(a.estimated_hours.total_cmp(&b.estimated_hours))
        });
        sorted
    }

    /// Split every topic into sessions, filling each day up to
    /// `daily_hours` before moving on to the next one. Day 0 is `start`.
    fn distribute_topics(&self, topics: &[StudyTopic], start: DateTime<Utc>) -> Vec<StudySession> {
        let daily = self.daily_hours();
        let max_session = self.max_session_hours();
        let stamp = start.timestamp_millis();

        let mut sessions = Vec::new();
        let mut day: i64 = 0;
        let mut used_today = 0.0_f64;

        for topic in self.prioritize_topics(topics) {
            let mut remaining = if topic.estimated_hours.is_finite() {
                topic.estimated_hours.max(0.0)
            } else {
                0.0
            };

            while remaining > HOURS_EPSILON {
                let duration = remaining.min(daily - used_today).min(max_session);
                if duration > HOURS_EPSILON {
                    sessions.push(StudySession {
                        id: format!("session-{stamp}-{}", sessions.len()),
                        topic_id: topic.id.clone(),
                        duration,
                        completed: false,
                        scheduled_date: start + Duration::days(day),
                        completed_date: None,
                    });
                    remaining -= duration;
                    used_today += duration;
                }
                if used_today >= daily - HOURS_EPSILON {
                    day += 1;
                    used_today = 0.0;
                }
            }
        }
        sessions
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntensiveStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct RegularStrategy;

#[derive(Debug, Clone, Copy, Default)]
pub struct LightStrategy;

impl StudyPlanStrategy for IntensiveStrategy {
    fn kind(&self) -> StudyStrategyType {
        StudyStrategyType::Intensive
    }
    fn daily_hours(&self) -> f64 {
        8.0
    }
    fn max_session_hours(&self) -> f64 {
        3.0
    }
    fn break_frequency_minutes(&self) -> u32 {
        50
    }
}

impl StudyPlanStrategy for RegularStrategy {
    fn kind(&self) -> StudyStrategyType {
        StudyStrategyType::Regular
    }
    fn daily_hours(&self) -> f64 {
        4.0
    }
    fn max_session_hours(&self) -> f64 {
        2.0
    }
    fn break_frequency_minutes(&self) -> u32 {
        45
    }
}

impl StudyPlanStrategy for LightStrategy {
    fn kind(&self) -> StudyStrategyType {
        StudyStrategyType::Light
    }
    fn daily_hours(&self) -> f64 {
        2.0
    }
    fn max_session_hours(&self) -> f64 {
        1.0
    }
    fn break_frequency_minutes(&self) -> u32 {
        30
    }
}

impl StudyStrategyType {
    pub fn strategy(self) -> &'static dyn StudyPlanStrategy {
        match self {
            StudyStrategyType::Intensive => &IntensiveStrategy,
            StudyStrategyType::Regular => &RegularStrategy,
            StudyStrategyType::Light => &LightStrategy,
        }
    }
}
