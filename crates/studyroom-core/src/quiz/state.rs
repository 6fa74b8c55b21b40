//! Quiz state variants.
//!
//! ```text
//! NotStarted --start--> InProgress --complete--> Completed --review--> Reviewing
//!      ^                                                                   |
//!      +-------------------------------reset-------------------------------+
//! ```
//!
//! `reset` lives on [`Quiz`](super::Quiz) and is legal from every state.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::context::Quiz;
use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuizState {
    NotStarted,
    InProgress,
    Completed,
    Reviewing,
}

impl QuizState {
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::NotStarted => "NOT_STARTED",
            QuizState::InProgress => "IN_PROGRESS",
            QuizState::Completed => "COMPLETED",
            QuizState::Reviewing => "REVIEWING",
        }
    }

    pub fn can_answer(&self) -> bool {
        matches!(self, QuizState::InProgress)
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, QuizState::InProgress)
    }

    pub fn start(self, quiz: &mut Quiz) -> Result<(), TransitionError> {
        match self {
            QuizState::NotStarted => {
                quiz.set_state(QuizState::InProgress);
                quiz.set_current_question_index(0);
                Ok(())
            }
            QuizState::InProgress => Err(TransitionError::QuizAlreadyStarted),
            QuizState::Completed => Err(TransitionError::RestartCompletedQuiz),
            QuizState::Reviewing => Err(TransitionError::StartWhileReviewing),
        }
    }

    pub fn answer(
        self,
        quiz: &mut Quiz,
        question_id: &str,
        answer_index: usize,
    ) -> Result<(), TransitionError> {
        match self {
            QuizState::NotStarted => Err(TransitionError::AnswerBeforeStart),
            QuizState::InProgress => {
                quiz.record_answer(question_id, answer_index);
                let current = quiz.current_question_index();
                if current + 1 < quiz.data().questions.len() {
                    quiz.set_current_question_index(current + 1);
                }
                Ok(())
            }
            QuizState::Completed => Err(TransitionError::AnswerCompletedQuiz),
            QuizState::Reviewing => Err(TransitionError::AnswerWhileReviewing),
        }
    }

    pub fn complete(self, quiz: &mut Quiz) -> Result<(), TransitionError> {
        match self {
            QuizState::NotStarted => Err(TransitionError::CompleteBeforeStart),
            QuizState::InProgress => {
                let all_answered = quiz
                    .data()
                    .questions
                    .iter()
                    .all(|q| quiz.is_answered(&q.id));
                if !all_answered {
                    return Err(TransitionError::UnansweredQuestions);
                }
                quiz.set_state(QuizState::Completed);
                Ok(())
            }
            QuizState::Completed | QuizState::Reviewing => {
                Err(TransitionError::QuizAlreadyCompleted)
            }
        }
    }

    pub fn review(self, quiz: &mut Quiz) -> Result<(), TransitionError> {
        match self {
            QuizState::NotStarted => Err(TransitionError::ReviewBeforeStart),
            QuizState::InProgress => Err(TransitionError::ReviewWhileInProgress),
            QuizState::Completed => {
                quiz.set_state(QuizState::Reviewing);
                quiz.set_current_question_index(0);
                Ok(())
            }
            QuizState::Reviewing => Ok(()),
        }
    }
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
