//! Question generation with ordered fallback.
//!
//! Strategies are tried in registration order. The first available one that
//! supports the requested type and returns at least one question wins; any
//! error or empty result moves on to the next candidate.

use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::ai::{AiQuestionStrategy, QuizAiClient};
use super::heuristic::{HeuristicMultipleChoice, HeuristicTrueFalse};
use super::types::{Question, QuestionType};
use crate::error::GenerationError;

/// Share of a mixed quiz that is multiple choice.
const MIXED_MULTIPLE_CHOICE_RATIO: f64 = 0.6;

pub trait QuestionStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn supports(&self, question_type: QuestionType) -> bool;

    /// Whether the strategy can run right now.
    fn is_available(&self) -> bool {
        true
    }

    /// Produce up to `count` questions from `content`.
    fn generate(&self, content: &str, count: usize) -> Result<Vec<Question>, GenerationError>;
}

/// `"{prefix}-{index}-{uuid}"`.
pub fn create_question_id(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index}-{}", Uuid::new_v4())
}

pub struct QuestionGenerator {
    strategies: Vec<Box<dyn QuestionStrategy>>,
}

impl Default for QuestionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionGenerator {
    /// Heuristic multiple choice and true/false only.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(HeuristicMultipleChoice),
                Box::new(HeuristicTrueFalse),
            ],
        }
    }

    /// No strategies at all. Register them with [`register`](Self::register).
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// AI strategies first, heuristics as the fallback.
    pub fn with_ai_client(client: Arc<dyn QuizAiClient>) -> Self {
        let mut generator = Self::empty();
        generator.register(Box::new(AiQuestionStrategy::multiple_choice(Arc::clone(
            &client,
        ))));
        generator.register(Box::new(AiQuestionStrategy::true_false(client)));
        generator.register(Box::new(HeuristicMultipleChoice));
        generator.register(Box::new(HeuristicTrueFalse));
        generator
    }

    /// Append a strategy. Earlier registrations are tried first.
    pub fn register(&mut self, strategy: Box<dyn QuestionStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// # Errors
    /// `UnknownStrategy` when nothing supports `question_type`;
    /// `StrategiesExhausted` when every candidate was unavailable, failed or
    /// came back empty.
    pub fn generate_questions(
        &self,
        content: &str,
        question_type: QuestionType,
        count: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        let mut candidates = self
            .strategies
            .iter()
            .filter(|s| s.supports(question_type))
            .peekable();
        if candidates.peek().is_none() {
            return Err(GenerationError::UnknownStrategy { question_type });
        }

        for strategy in candidates {
            if !strategy.is_available() {
                debug!(strategy = strategy.name(), "strategy unavailable, skipping");
                continue;
            }
            match strategy.generate(content, count) {
                Ok(questions) if !questions.is_empty() => {
                    debug!(
                        strategy = strategy.name(),
                        count = questions.len(),
                        "questions generated"
                    );
                    return Ok(questions);
                }
                Ok(_) => {
                    debug!(strategy = strategy.name(), "strategy returned no questions");
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "question strategy failed, falling back");
                }
            }
        }

        Err(GenerationError::StrategiesExhausted { question_type })
    }

    /// `ceil(total * 0.6)` multiple choice, the rest true/false, shuffled.
    ///
    /// # Errors
    /// Propagates the first generation error.
    pub fn generate_mixed_quiz(
        &self,
        content: &str,
        total: usize,
    ) -> Result<Vec<Question>, GenerationError> {
        let (mcq_count, tf_count) = mixed_split(total);

        let mut questions = Vec::with_capacity(total);
        if mcq_count > 0 {
            questions.extend(self.generate_questions(
                content,
                QuestionType::MultipleChoice,
                mcq_count,
            )?);
        }
        if tf_count > 0 {
            questions.extend(self.generate_questions(content, QuestionType::TrueFalse, tf_count)?);
        }
        questions.shuffle(&mut rand::thread_rng());
        Ok(questions)
    }
}

/// `(multiple choice, true/false)` counts for a mixed quiz of `total`.
pub fn mixed_split(total: usize) -> (usize, usize) {
    let mcq = (total as f64 * MIXED_MULTIPLE_CHOICE_RATIO).ceil() as usize;
    let mcq = mcq.min(total);
    (mcq, total - mcq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_split_rounds_multiple_choice_up() {
        assert_eq!(mixed_split(10), (6, 4));
        assert_eq!(mixed_split(5), (3, 2));
        assert_eq!(mixed_split(1), (1, 0));
        assert_eq!(mixed_split(0), (0, 0));
    }

    #[test]
    fn ids_carry_prefix_and_index() {
        let id = create_question_id("ai-tf", 3);
        assert!(id.starts_with("ai-tf-3-"));
        assert!(Uuid::parse_str(&id["ai-tf-3-".len()..]).is_ok());
    }

    #[test]
    fn default_generator_registers_heuristics() {
        assert_eq!(
            QuestionGenerator::new().strategy_names(),
            vec!["heuristic-multiple-choice", "heuristic-true-false"]
        );
    }

    #[test]
    fn fill_in_the_blank_has_no_strategy() {
        let err = QuestionGenerator::new()
            .generate_questions("text", QuestionType::FillInTheBlank, 1)
            .unwrap_err();
        assert!(matches!(err, GenerationError::UnknownStrategy { .. }));
    }
}
