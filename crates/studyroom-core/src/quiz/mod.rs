//! Quizzes: the answer-taking state machine and question generation.

mod ai;
mod context;
mod generator;
mod heuristic;
mod state;
mod types;

pub use ai::{AiQuestionStrategy, OpenAiQuizClient, QuizAiClient};
pub use context::Quiz;
pub use generator::{create_question_id, mixed_split, QuestionGenerator, QuestionStrategy};
pub use heuristic::{HeuristicMultipleChoice, HeuristicTrueFalse};
pub use state::QuizState;
pub use types::{Question, QuestionDraft, QuestionType, QuizData, QuizResult};
