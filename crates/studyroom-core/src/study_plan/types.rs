use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Higher is studied first.
    pub fn weight(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyTopic {
    pub id: String,
    pub title: String,
    pub estimated_hours: f64,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub topic_id: String,
    /// Hours.
    pub duration: f64,
    #[serde(default)]
    pub completed: bool,
    pub scheduled_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudyStrategyType {
    Intensive,
    Regular,
    Light,
}

impl StudyStrategyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyStrategyType::Intensive => "INTENSIVE",
            StudyStrategyType::Regular => "REGULAR",
            StudyStrategyType::Light => "LIGHT",
        }
    }
}

impl fmt::Display for StudyStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: String,
    pub user_id: String,
    pub topics: Vec<StudyTopic>,
    pub sessions: Vec<StudySession>,
    pub strategy: StudyStrategyType,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<DateTime<Utc>>,
}

impl StudyPlan {
    pub fn completed_sessions(&self) -> impl Iterator<Item = &StudySession> {
        self.sessions.iter().filter(|s| s.completed)
    }

    pub fn hours_studied(&self) -> f64 {
        self.completed_sessions().map(|s| s.duration).sum()
    }

    pub fn total_hours(&self) -> f64 {
        self.sessions.iter().map(|s| s.duration).sum()
    }
}

/// The restorable part of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanState {
    pub topics: Vec<StudyTopic>,
    pub sessions: Vec<StudySession>,
    pub completed_sessions: usize,
    pub total_hours_studied: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanMemento {
    pub state: StudyPlanState,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyProgress {
    pub completed_topics: usize,
    pub total_topics: usize,
    pub completed_sessions: usize,
    pub total_sessions: usize,
    pub hours_studied: f64,
    pub total_hours: f64,
    /// Rounded share of scheduled hours already studied, 0 to 100.
    pub percentage_complete: u32,
}
