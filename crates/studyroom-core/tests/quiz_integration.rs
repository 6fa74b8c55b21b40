//! Integration tests for taking a quiz from start to review.

use chrono::Utc;
use studyroom_core::quiz::{Question, QuestionType, Quiz, QuizData, QuizState};
use studyroom_core::TransitionError;

fn question(id: &str, correct: usize) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Pergunta {id}"),
        question_type: QuestionType::MultipleChoice,
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer: correct,
        explanation: None,
    }
}

fn sample_quiz() -> Quiz {
    Quiz::new(QuizData {
        id: "test-quiz".to_string(),
        title: "Test Quiz".to_string(),
        questions: vec![question("q1", 0), question("q2", 1)],
        created_at: Utc::now(),
    })
}

#[test]
fn test_new_quiz_is_not_started() {
    let quiz = sample_quiz();
    assert_eq!(quiz.state(), QuizState::NotStarted);
    assert_eq!(quiz.current_question_index(), 0);
    assert!(quiz.answers().is_empty());
    assert!(quiz.result().is_none());
}

#[test]
fn test_all_correct_scores_100() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    quiz.answer_question("q1", 0).unwrap();
    quiz.answer_question("q2", 1).unwrap();
    quiz.complete().unwrap();

    assert_eq!(quiz.state(), QuizState::Completed);
    let result = quiz.result().unwrap();
    assert_eq!(result.score, 100);
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.answered_questions.len(), 2);
    assert!(result.completed_at.is_some());
}

#[test]
fn test_half_correct_scores_50() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    quiz.answer_question("q1", 0).unwrap();
    quiz.answer_question("q2", 3).unwrap();
    quiz.complete().unwrap();
    assert_eq!(quiz.calculate_score(), 50);
}

#[test]
fn test_answering_advances_current_question() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    assert_eq!(quiz.current_question().unwrap().id, "q1");
    quiz.answer_question("q1", 2).unwrap();
    assert_eq!(quiz.current_question().unwrap().id, "q2");
    quiz.answer_question("q2", 2).unwrap();
    // Stays on the last question.
    assert_eq!(quiz.current_question_index(), 1);
    assert_eq!(quiz.user_answer("q1"), Some(2));
}

#[test]
fn test_review_after_complete_blocks_changes() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    quiz.answer_question("q1", 0).unwrap();
    quiz.answer_question("q2", 1).unwrap();
    quiz.complete().unwrap();
    quiz.review().unwrap();

    assert_eq!(quiz.state(), QuizState::Reviewing);
    assert_eq!(quiz.current_question_index(), 0);
    assert_eq!(
        quiz.answer_question("q1", 1),
        Err(TransitionError::AnswerWhileReviewing)
    );
    assert_eq!(
        quiz.answer_question("q1", 1).unwrap_err().to_string(),
        "Cannot change answers while reviewing"
    );
    assert_eq!(quiz.user_answer("q1"), Some(0));
    assert_eq!(quiz.result().unwrap().score, 100);
}

#[test]
fn test_reset_clears_everything() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    quiz.answer_question("q1", 0).unwrap();
    quiz.reset();

    assert_eq!(quiz.state(), QuizState::NotStarted);
    assert_eq!(quiz.current_question_index(), 0);
    assert!(!quiz.is_answered("q1"));

    quiz.start().unwrap();
    assert_eq!(quiz.state(), QuizState::InProgress);
}

#[test]
fn test_complete_with_unanswered_keeps_state() {
    let mut quiz = sample_quiz();
    quiz.start().unwrap();
    quiz.answer_question("q1", 0).unwrap();

    let err = quiz.complete().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot complete quiz with unanswered questions"
    );
    assert_eq!(quiz.state(), QuizState::InProgress);
    assert!(quiz.result().is_none());
}

#[test]
fn test_illegal_operations_report_exact_messages() {
    let mut quiz = sample_quiz();
    assert_eq!(
        quiz.answer_question("q1", 0).unwrap_err().to_string(),
        "Cannot answer questions before starting quiz"
    );
    assert_eq!(
        quiz.complete().unwrap_err().to_string(),
        "Cannot complete quiz before starting"
    );
    assert_eq!(
        quiz.review().unwrap_err().to_string(),
        "Cannot review quiz before starting"
    );

    quiz.start().unwrap();
    assert_eq!(quiz.start().unwrap_err().to_string(), "Quiz already started");
    assert_eq!(
        quiz.review().unwrap_err().to_string(),
        "Cannot review quiz while in progress"
    );

    quiz.answer_question("q1", 0).unwrap();
    quiz.answer_question("q2", 0).unwrap();
    quiz.complete().unwrap();
    assert_eq!(
        quiz.start().unwrap_err().to_string(),
        "Cannot restart completed quiz"
    );
    assert_eq!(
        quiz.answer_question("q1", 1).unwrap_err().to_string(),
        "Cannot answer completed quiz"
    );
    assert_eq!(
        quiz.complete().unwrap_err().to_string(),
        "Quiz already completed"
    );

    quiz.review().unwrap();
    assert_eq!(
        quiz.start().unwrap_err().to_string(),
        "Cannot start while reviewing"
    );
    assert_eq!(quiz.review(), Ok(()));
}

#[test]
fn test_empty_quiz_completes_with_zero_score() {
    let mut quiz = Quiz::new(QuizData {
        id: "empty".to_string(),
        title: "Empty".to_string(),
        questions: Vec::new(),
        created_at: Utc::now(),
    });
    quiz.start().unwrap();
    quiz.complete().unwrap();
    assert_eq!(quiz.result().unwrap().score, 0);
}

#[test]
fn test_quiz_data_round_trips_through_json() {
    let quiz = sample_quiz();
    let json = serde_json::to_string(quiz.data()).unwrap();
    assert!(json.contains("\"type\":\"MULTIPLE_CHOICE\""));
    assert!(json.contains("\"correctAnswer\":0"));
    let back: QuizData = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, quiz.data());
}
