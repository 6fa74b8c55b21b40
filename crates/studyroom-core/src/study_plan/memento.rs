//! Plan history.
//!
//! [`StudyPlanOriginator`] edits a plan and can roll its topics and
//! sessions back to a captured [`StudyPlanState`]. [`StudyPlanCaretaker`]
//! keeps the captured states, oldest first.

use chrono::Utc;

use super::types::{StudyPlan, StudyPlanMemento, StudyPlanState, StudyProgress, StudyTopic};

pub struct StudyPlanOriginator {
    plan: StudyPlan,
}

impl StudyPlanOriginator {
    pub fn new(plan: StudyPlan) -> Self {
        Self { plan }
    }

    pub fn plan(&self) -> &StudyPlan {
        &self.plan
    }

    pub fn into_plan(self) -> StudyPlan {
        self.plan
    }

    /// Mark a session done. Its topic is marked done once every session of
    /// that topic is. Returns false for an unknown or already completed
    /// session.
    pub fn complete_session(&mut self, session_id: &str) -> bool {
        let Some(session) = self
            .plan
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id && !s.completed)
        else {
            return false;
        };
        session.completed = true;
        session.completed_date = Some(Utc::now());
        let topic_id = session.topic_id.clone();

        let all_done = self
            .plan
            .sessions
            .iter()
            .filter(|s| s.topic_id == topic_id)
            .all(|s| s.completed);
        if all_done {
            if let Some(topic) = self.plan.topics.iter_mut().find(|t| t.id == topic_id) {
                topic.completed = true;
            }
        }
        true
    }

    pub fn add_topic(&mut self, topic: StudyTopic) {
        self.plan.topics.push(topic);
    }

    /// Drops the topic and all of its sessions.
    pub fn remove_topic(&mut self, topic_id: &str) {
        self.plan.topics.retain(|t| t.id != topic_id);
        self.plan.sessions.retain(|s| s.topic_id != topic_id);
    }

    pub fn progress(&self) -> StudyProgress {
        let hours_studied = self.plan.hours_studied();
        let total_hours = self.plan.total_hours();
        let percentage_complete = if total_hours > 0.0 {
            (hours_studied / total_hours * 100.0).round() as u32
        } else {
            0
        };

        StudyProgress {
            completed_topics: self.plan.topics.iter().filter(|t| t.completed).count(),
            total_topics: self.plan.topics.len(),
            completed_sessions: self.plan.completed_sessions().count(),
            total_sessions: self.plan.sessions.len(),
            hours_studied,
            total_hours,
            percentage_complete,
        }
    }

    pub fn create_memento(&self) -> StudyPlanMemento {
        StudyPlanMemento {
            state: StudyPlanState {
                topics: self.plan.topics.clone(),
                sessions: self.plan.sessions.clone(),
                completed_sessions: self.plan.completed_sessions().count(),
                total_hours_studied: self.plan.hours_studied(),
            },
            timestamp: Utc::now(),
        }
    }

    pub fn restore_from_memento(&mut self, state: &StudyPlanState) {
        self.plan.topics = state.topics.clone();
        self.plan.sessions = state.sessions.clone();
    }
}

/// Bounded history of plan states.
#[derive(Debug, Clone)]
pub struct StudyPlanCaretaker {
    history: Vec<StudyPlanMemento>,
    max_history: usize,
}

impl Default for StudyPlanCaretaker {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyPlanCaretaker {
    pub const DEFAULT_MAX_HISTORY: usize = 10;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_MAX_HISTORY)
    }

    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            history: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Capture `plan`. The oldest entry is evicted once full.
    pub fn save(&mut self, plan: &StudyPlan) {
        let memento = StudyPlanOriginator::new(plan.clone()).create_memento();
        self.history.push(memento);
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
    }

    pub fn restore(&self, index: usize) -> Option<&StudyPlanState> {
        self.history.get(index).map(|m| &m.state)
    }

    pub fn latest(&self) -> Option<&StudyPlanState> {
        self.history.last().map(|m| &m.state)
    }

    pub fn history(&self) -> &[StudyPlanMemento] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
