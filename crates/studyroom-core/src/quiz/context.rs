//! The quiz context.
//!
//! Like the timer engine, [`Quiz`] holds the data and hands every operation
//! to its current [`QuizState`]. Rejected operations leave it unchanged.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

use super::state::QuizState;
use super::types::{Question, QuizData, QuizResult};
use crate::error::TransitionError;

#[derive(Debug, Clone)]
pub struct Quiz {
    data: QuizData,
    state: QuizState,
    current_question_index: usize,
    answers: BTreeMap<String, usize>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Quiz {
    pub fn new(data: QuizData) -> Self {
        Self {
            data,
            state: QuizState::NotStarted,
            current_question_index: 0,
            answers: BTreeMap::new(),
            started_at: None,
            completed_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn data(&self) -> &QuizData {
        &self.data
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.data.questions.get(self.current_question_index)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn user_answer(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    /// Copy of the recorded answers.
    pub fn answers(&self) -> BTreeMap<String, usize> {
        self.answers.clone()
    }

    /// Rounded percentage of correctly answered questions. An empty quiz
    /// scores 0.
    pub fn calculate_score(&self) -> u32 {
        let total = self.data.questions.len();
        if total == 0 {
            return 0;
        }
        let correct = self
            .data
            .questions
            .iter()
            .filter(|q| self.answers.get(&q.id) == Some(&q.correct_answer))
            .count();
        (correct as f64 / total as f64 * 100.0).round() as u32
    }

    /// Summary of a finished quiz. `None` until it has been completed.
    pub fn result(&self) -> Option<QuizResult> {
        if !matches!(self.state, QuizState::Completed | QuizState::Reviewing) {
            return None;
        }
        Some(QuizResult {
            quiz_id: self.data.id.clone(),
            score: self.calculate_score(),
            total_questions: self.data.questions.len(),
            answered_questions: self.answers.clone(),
            started_at: self.started_at.unwrap_or(self.data.created_at),
            completed_at: self.completed_at,
        })
    }

    // ── Context mutators (used by the state variants) ────────────────

    pub(crate) fn set_state(&mut self, state: QuizState) {
        debug!(quiz = %self.data.id, from = %self.state, to = %state, "quiz state change");
        match state {
            QuizState::InProgress => self.started_at = Some(Utc::now()),
            QuizState::Completed => self.completed_at = Some(Utc::now()),
            QuizState::NotStarted | QuizState::Reviewing => {}
        }
        self.state = state;
    }

    pub(crate) fn set_current_question_index(&mut self, index: usize) {
        self.current_question_index = index;
    }

    pub(crate) fn record_answer(&mut self, question_id: &str, answer_index: usize) {
        self.answers.insert(question_id.to_string(), answer_index);
    }

    // ── Operations (delegated to the current state) ──────────────────

    pub fn start(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.start(self)
    }

    pub fn answer_question(
        &mut self,
        question_id: &str,
        answer_index: usize,
    ) -> Result<(), TransitionError> {
        let state = self.state;
        state.answer(self, question_id, answer_index)
    }

    pub fn complete(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.complete(self)
    }

    pub fn review(&mut self) -> Result<(), TransitionError> {
        let state = self.state;
        state.review(self)
    }

    /// Back to a fresh, unstarted quiz over the same questions.
    pub fn reset(&mut self) {
        self.state = QuizState::NotStarted;
        self.current_question_index = 0;
        self.answers.clear();
        self.started_at = None;
        self.completed_at = None;
    }
}
