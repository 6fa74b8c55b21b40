//! AI-backed question generation.
//!
//! [`QuizAiClient`] is the seam: [`OpenAiQuizClient`] talks to an OpenAI
//! compatible chat completions endpoint, and [`AiQuestionStrategy`] adapts
//! any client to the generator's strategy interface.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::generator::{create_question_id, QuestionStrategy};
use super::heuristic::{plain_text, FALSE_OPTION, TRUE_OPTION};
use super::types::{Question, QuestionDraft, QuestionType};
use crate::error::GenerationError;
use crate::storage::AiConfig;

pub const AI_MULTIPLE_CHOICE_PREFIX: &str = "ai-mcq";
pub const AI_TRUE_FALSE_PREFIX: &str = "ai-tf";

const MAX_MULTIPLE_CHOICE_OPTIONS: usize = 4;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const SYSTEM_PROMPT: &str =
    "Você é um gerador de quizzes para estudantes brasileiros. Responda apenas com JSON válido.";

pub trait QuizAiClient: Send + Sync {
    /// Whether credentials and transport are in place.
    fn can_generate(&self) -> bool;

    fn generate(
        &self,
        content: &str,
        question_type: QuestionType,
        count: usize,
    ) -> Result<Vec<QuestionDraft>, GenerationError>;
}

// ── OpenAI client ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiQuizClient {
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_content_length: usize,
    base_url: String,
}

impl OpenAiQuizClient {
    /// Settings from `[ai]`, key from the configured environment variable.
    pub fn from_config(config: &AiConfig) -> Self {
        Self {
            api_key: config.api_key(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_content_length: config.max_content_length,
            base_url: config.base_url.clone(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|k: &String| !k.trim().is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Tags stripped, whitespace collapsed, cut to `max_content_length` chars.
    fn sanitize(&self, content: &str) -> String {
        plain_text(content)
            .chars()
            .take(self.max_content_length)
            .collect()
    }

    fn build_prompt(&self, content: &str, question_type: QuestionType, count: usize) -> String {
        let sanitized = self.sanitize(content);
        match question_type {
            QuestionType::TrueFalse => format!(
                "Gere exatamente {count} questões de verdadeiro ou falso sobre o conteúdo a seguir. \
                 Use o formato JSON: {{\"questions\": [{{\"text\": string, \"options\": [\"Verdadeiro\", \"Falso\"], \
                 \"correctAnswer\": 0 ou 1, \"explanation\": string}}]}}. Conteúdo: {sanitized}"
            ),
            _ => format!(
                "Gere {count} questões de múltipla escolha em português brasileiro com quatro alternativas \
                 únicas (A, B, C, D) sobre o conteúdo a seguir. Use apenas o formato JSON: \
                 {{\"questions\": [{{\"text\": string, \"options\": [string, string, string, string], \
                 \"correctAnswer\": número de 0 a 3, \"explanation\": string}}]}}. Conteúdo: {sanitized}"
            ),
        }
    }
}

impl QuizAiClient for OpenAiQuizClient {
    fn can_generate(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate(
        &self,
        content: &str,
        question_type: QuestionType,
        count: usize,
    ) -> Result<Vec<QuestionDraft>, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::AiUnavailable)?;

        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": self.build_prompt(content, question_type, count) },
            ],
        });

        debug!(model = %self.model, %question_type, count, "requesting AI questions");
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::AiRequest(format!(
                "OpenAI request failed with status {}",
                status.as_u16()
            )));
        }

        let payload: Value = response
            .json()
            .map_err(|e| GenerationError::AiResponse(e.to_string()))?;
        parse_drafts(&payload, question_type, count)
    }
}

/// Pull the model's text out of a chat completion payload.
fn extract_content(payload: &Value) -> Result<String, GenerationError> {
    if let Some(parts) = payload.get("output_text").and_then(Value::as_array) {
        if !parts.is_empty() {
            let joined: Vec<&str> = parts.iter().filter_map(Value::as_str).collect();
            return Ok(joined.join("\n"));
        }
    }

    match payload.pointer("/choices/0/message/content") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Array(parts)) => Ok(parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<String>()
            .trim()
            .to_string()),
        _ => Err(GenerationError::AiResponse(
            "response did not contain textual content".into(),
        )),
    }
}

fn parse_drafts(
    payload: &Value,
    question_type: QuestionType,
    count: usize,
) -> Result<Vec<QuestionDraft>, GenerationError> {
    let raw = extract_content(payload)?;
    let data: Value = serde_json::from_str(&raw).map_err(|e| {
        GenerationError::AiResponse(format!("failed to parse JSON from response: {e}"))
    })?;
    let questions = data
        .get("questions")
        .and_then(Value::as_array)
        .ok_or_else(|| GenerationError::AiResponse("response missing questions array".into()))?;

    Ok(questions
        .iter()
        .take(count)
        .filter_map(|candidate| normalize_draft(candidate, question_type))
        .collect())
}

/// Coerce one model-produced question into a usable draft, or drop it.
fn normalize_draft(candidate: &Value, question_type: QuestionType) -> Option<QuestionDraft> {
    let object = candidate.as_object()?;

    let text = object.get("text")?.as_str()?.trim().to_string();
    if text.is_empty() {
        return None;
    }

    let options: Vec<String> = if question_type == QuestionType::TrueFalse {
        vec![TRUE_OPTION.to_string(), FALSE_OPTION.to_string()]
    } else {
        object
            .get("options")
            .and_then(Value::as_array)
            .map(|raw| {
                raw.iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .take(MAX_MULTIPLE_CHOICE_OPTIONS)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    };
    if options.is_empty() {
        return None;
    }

    let correct_answer = object
        .get("correctAnswer")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .filter(|n| *n < options.len())
        .unwrap_or(0);

    let explanation = object
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from);

    Some(QuestionDraft {
        text,
        options,
        correct_answer,
        explanation,
    })
}

// ── Strategy adapter ─────────────────────────────────────────────────

/// Turns an AI client into a question strategy for one question type.
pub struct AiQuestionStrategy {
    client: Arc<dyn QuizAiClient>,
    question_type: QuestionType,
    prefix: &'static str,
    name: &'static str,
}

impl AiQuestionStrategy {
    pub fn multiple_choice(client: Arc<dyn QuizAiClient>) -> Self {
        Self {
            client,
            question_type: QuestionType::MultipleChoice,
            prefix: AI_MULTIPLE_CHOICE_PREFIX,
            name: "ai-multiple-choice",
        }
    }

    pub fn true_false(client: Arc<dyn QuizAiClient>) -> Self {
        Self {
            client,
            question_type: QuestionType::TrueFalse,
            prefix: AI_TRUE_FALSE_PREFIX,
            name: "ai-true-false",
        }
    }
}

impl QuestionStrategy for AiQuestionStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, question_type: QuestionType) -> bool {
        question_type == self.question_type
    }

    fn is_available(&self) -> bool {
        self.client.can_generate()
    }

    fn generate(&self, content: &str, count: usize) -> Result<Vec<Question>, GenerationError> {
        let drafts = self.client.generate(content, self.question_type, count)?;
        Ok(drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft.into_question(create_question_id(self.prefix, index), self.question_type)
            })
            .collect())
    }
}
