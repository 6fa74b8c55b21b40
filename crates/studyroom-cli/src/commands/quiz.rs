use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use studyroom_core::quiz::{
    OpenAiQuizClient, QuestionGenerator, QuestionType, Quiz, QuizAiClient, QuizData,
};
use studyroom_core::Config;
use tracing::debug;

#[derive(Clone, Copy, ValueEnum)]
pub enum QuizKind {
    MultipleChoice,
    TrueFalse,
    Mixed,
}

#[derive(Subcommand)]
pub enum QuizAction {
    /// Generate a quiz from a text or HTML file and print it as JSON
    Generate {
        /// Source content
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum, default_value = "mixed")]
        kind: QuizKind,
        /// Number of questions (default: quiz.default_count)
        #[arg(long)]
        count: Option<usize>,
        #[arg(long)]
        title: Option<String>,
        /// Only use the offline heuristics
        #[arg(long)]
        offline: bool,
    },
    /// Take a quiz file with the given answers and print the result
    Grade {
        /// Quiz JSON as printed by `generate`
        #[arg(long)]
        file: PathBuf,
        /// Comma-separated option indices, one per question in order
        #[arg(long, value_delimiter = ',')]
        answers: Vec<usize>,
    },
}

fn generator(config: &Config, offline: bool) -> QuestionGenerator {
    if offline || !config.ai.enabled {
        return QuestionGenerator::new();
    }
    let client = OpenAiQuizClient::from_config(&config.ai);
    if !client.can_generate() {
        debug!(env = %config.ai.api_key_env, "no AI key set, using heuristics only");
        return QuestionGenerator::new();
    }
    QuestionGenerator::with_ai_client(Arc::new(client))
}

pub fn run(action: QuizAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuizAction::Generate {
            file,
            kind,
            count,
            title,
            offline,
        } => {
            let config = Config::load()?;
            let content = std::fs::read_to_string(&file)?;
            let count = count.unwrap_or(config.quiz.default_count);
            let generator = generator(&config, offline);

            let questions = match kind {
                QuizKind::MultipleChoice => {
                    generator.generate_questions(&content, QuestionType::MultipleChoice, count)?
                }
                QuizKind::TrueFalse => {
                    generator.generate_questions(&content, QuestionType::TrueFalse, count)?
                }
                QuizKind::Mixed => generator.generate_mixed_quiz(&content, count)?,
            };

            let now = Utc::now();
            let data = QuizData {
                id: format!("quiz-{}", now.timestamp_millis()),
                title: title.unwrap_or_else(|| {
                    file.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Quiz".to_string())
                }),
                questions,
                created_at: now,
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        QuizAction::Grade { file, answers } => {
            let data: QuizData = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            data.validate()?;

            let ids: Vec<String> = data.questions.iter().map(|q| q.id.clone()).collect();
            let mut quiz = Quiz::new(data);
            quiz.start()?;
            for (id, answer) in ids.iter().zip(answers) {
                quiz.answer_question(id, answer)?;
            }
            quiz.complete()?;

            if let Some(result) = quiz.result() {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }
    Ok(())
}
