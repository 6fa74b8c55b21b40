//! Offline question strategies that lift questions straight out of the text.
//!
//! They never fail and need nothing configured, which makes them the last
//! resort behind the AI strategies.

use regex::Regex;
use std::sync::LazyLock;

use super::generator::{create_question_id, QuestionStrategy};
use super::types::{Question, QuestionType};
use crate::error::GenerationError;

pub const MULTIPLE_CHOICE_PREFIX: &str = "mcq";
pub const TRUE_FALSE_PREFIX: &str = "tf";

pub const TRUE_OPTION: &str = "Verdadeiro";
pub const FALSE_OPTION: &str = "Falso";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Replace every tag with a space.
pub(crate) fn strip_html(content: &str) -> String {
    HTML_TAG.replace_all(content, " ").into_owned()
}

/// Tags stripped, whitespace runs collapsed to one space, trimmed.
pub(crate) fn plain_text(content: &str) -> String {
    WHITESPACE
        .replace_all(&strip_html(content), " ")
        .trim()
        .to_string()
}

/// Trimmed pieces between `.`, `!` and `?` longer than `min_len` characters.
fn sentences(text: &str, min_len: usize) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > min_len)
        .collect()
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((at, _)) => &text[..at],
        None => text,
    }
}

/// One question per paragraph, built from its first sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMultipleChoice;

impl HeuristicMultipleChoice {
    fn options(fact: &str) -> Vec<String> {
        let fact = fact.trim();
        let options: [&str; 4] = if fact.is_empty() {
            [
                "Informação não encontrada",
                "Alternativa A",
                "Alternativa B",
                "Alternativa C",
            ]
        } else {
            [
                fact,
                "Alternativa gerada automaticamente A",
                "Alternativa gerada automaticamente B",
                "Alternativa gerada automaticamente C",
            ]
        };
        options.iter().map(|o| o.to_string()).collect()
    }
}

impl QuestionStrategy for HeuristicMultipleChoice {
    fn name(&self) -> &'static str {
        "heuristic-multiple-choice"
    }

    fn supports(&self, question_type: QuestionType) -> bool {
        question_type == QuestionType::MultipleChoice
    }

    fn generate(&self, content: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
        let text = strip_html(content);
        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| p.chars().count() > 50)
            .collect();

        let questions = paragraphs
            .iter()
            .take(count)
            .enumerate()
            .filter_map(|(index, paragraph)| {
                let fact = *sentences(paragraph, 20).first()?;
                Some(Question {
                    id: create_question_id(MULTIPLE_CHOICE_PREFIX, index),
                    text: format!(
                        "Qual das alternativas melhor representa o conceito apresentado: \"{}...\"?",
                        truncate_chars(fact, 100)
                    ),
                    question_type: QuestionType::MultipleChoice,
                    options: Self::options(fact),
                    correct_answer: 0,
                    explanation: Some("Esta informação está presente no texto original.".into()),
                })
            })
            .collect();
        Ok(questions)
    }
}

/// Every long enough sentence becomes a true statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTrueFalse;

impl QuestionStrategy for HeuristicTrueFalse {
    fn name(&self) -> &'static str {
        "heuristic-true-false"
    }

    fn supports(&self, question_type: QuestionType) -> bool {
        question_type == QuestionType::TrueFalse
    }

    fn generate(&self, content: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
        let text = strip_html(content);
        let questions = sentences(&text, 30)
            .into_iter()
            .take(count)
            .enumerate()
            .map(|(index, sentence)| Question {
                id: create_question_id(TRUE_FALSE_PREFIX, index),
                text: sentence.to_string(),
                question_type: QuestionType::TrueFalse,
                options: vec![TRUE_OPTION.to_string(), FALSE_OPTION.to_string()],
                correct_answer: 0,
                explanation: Some("Esta afirmação é verdadeira conforme o texto.".into()),
            })
            .collect();
        Ok(questions)
    }
}
