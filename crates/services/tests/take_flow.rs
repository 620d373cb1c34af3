use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use quiz_core::model::{QuizId, QuizPayload};
use quiz_core::time::fixed_clock;
use services::{
    ApiError, FinishOutcome, QuizBackend, StartOutcome, SubmitRequest, SubmitResponse,
    TakeQuizError, TakeQuizService,
};

/// Scriptable backend double. Serves one quiz payload and a queue of
/// submission results, recording every submission it sees.
struct FakeBackend {
    quiz: Mutex<serde_json::Value>,
    submit_results: Mutex<VecDeque<Result<SubmitResponse, ApiError>>>,
    submissions: Mutex<Vec<(SubmitRequest, bool)>>,
}

impl FakeBackend {
    fn serving(quiz: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            quiz: Mutex::new(quiz),
            submit_results: Mutex::new(VecDeque::new()),
            submissions: Mutex::new(Vec::new()),
        })
    }

    fn push_submit(&self, result: Result<SubmitResponse, ApiError>) {
        self.submit_results.lock().unwrap().push_back(result);
    }

    fn recorded_submissions(&self) -> Vec<(SubmitRequest, bool)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizBackend for FakeBackend {
    async fn fetch_quiz(&self, _id: &QuizId) -> Result<QuizPayload, ApiError> {
        let value = self.quiz.lock().unwrap().clone();
        Ok(serde_json::from_value(value).expect("fixture payload deserializes"))
    }

    async fn submit_answers(
        &self,
        _id: &QuizId,
        request: SubmitRequest,
        retake: bool,
    ) -> Result<SubmitResponse, ApiError> {
        self.submissions.lock().unwrap().push((request, retake));
        self.submit_results
            .lock()
            .unwrap()
            .pop_front()
            .expect("a scripted submit result")
    }
}

fn two_question_quiz() -> serde_json::Value {
    json!({
        "_id": "quiz-1",
        "title": "Rust Basics",
        "subject": "Rust",
        "questions": [
            {
                "_id": "q1",
                "text": "What does ownership prevent?",
                "options": [
                    {"_id": "q1-o1", "text": "Data races"},
                    {"_id": "q1-o2", "text": "Slow builds"}
                ]
            },
            {
                "_id": "q2",
                "text": "What does ? do?",
                "options": [
                    {"_id": "q2-o1", "text": "Propagates errors"},
                    {"_id": "q2-o2", "text": "Panics"}
                ]
            }
        ]
    })
}

fn scored_response(score: f64) -> SubmitResponse {
    let mut quiz = two_question_quiz();
    quiz["isCompleted"] = json!(true);
    quiz["score"] = json!(score);
    serde_json::from_value(json!({
        "quiz": quiz,
        "score": score,
        "correctAnswers": 1,
        "totalQuestions": 2,
        "timeTaken": 30
    }))
    .unwrap()
}

fn service(backend: &Arc<FakeBackend>) -> TakeQuizService {
    TakeQuizService::with_clock(backend.clone() as Arc<dyn QuizBackend>, fixed_clock())
}

#[tokio::test]
async fn answer_both_questions_and_finish() {
    let backend = FakeBackend::serving(two_question_quiz());
    backend.push_submit(Ok(scored_response(50.0)));
    let service = service(&backend);

    let StartOutcome::Started(mut session) =
        service.start(&QuizId::new("quiz-1"), false).await.unwrap()
    else {
        panic!("expected a started session");
    };

    session.select_option(0).unwrap();
    session.advance();
    session.select_option(1).unwrap();
    assert!(session.can_finish());

    let outcome = service.finish(&mut session, false).await.unwrap();
    let FinishOutcome::Completed(result) = outcome else {
        panic!("expected a completed submission");
    };

    assert_eq!(result.score, 50.0);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.time_taken, 30);
    assert!(session.is_complete());
    assert_eq!(session.score(), Some(50.0));

    let submissions = backend.recorded_submissions();
    assert_eq!(submissions.len(), 1);
    let (request, retake) = &submissions[0];
    assert_eq!(request.answers, vec!["q1-o1", "q2-o2"]);
    // Start and finish share the fixed clock, so the measured time is zero.
    assert_eq!(request.completion_time, 0);
    assert!(!retake);
}

#[tokio::test]
async fn fresh_start_hides_leaked_correctness() {
    let mut quiz = two_question_quiz();
    quiz["questions"][0]["options"][0]["isCorrect"] = json!(true);
    let backend = FakeBackend::serving(quiz);
    let service = service(&backend);

    let StartOutcome::Started(session) =
        service.start(&QuizId::new("quiz-1"), false).await.unwrap()
    else {
        panic!("expected a started session");
    };

    assert!(
        session
            .quiz()
            .questions
            .iter()
            .flat_map(|q| &q.options)
            .all(|option| option.is_correct.is_none())
    );
}

#[tokio::test]
async fn completed_quiz_short_circuits_to_results() {
    let mut quiz = two_question_quiz();
    quiz["isCompleted"] = json!(true);
    quiz["score"] = json!(80.0);
    let backend = FakeBackend::serving(quiz);
    let service = service(&backend);

    let outcome = service.start(&QuizId::new("quiz-1"), false).await.unwrap();
    let StartOutcome::AlreadyCompleted(quiz) = outcome else {
        panic!("expected the completed short circuit");
    };
    assert_eq!(quiz.score, Some(80.0));
}

#[tokio::test]
async fn retake_starts_clean_but_keeps_correctness() {
    let mut quiz = two_question_quiz();
    quiz["isCompleted"] = json!(true);
    quiz["score"] = json!(80.0);
    quiz["completionTime"] = json!(120);
    quiz["questions"][0]["options"][0]["isCorrect"] = json!(true);
    quiz["questions"][0]["options"][1]["isCorrect"] = json!(false);
    let backend = FakeBackend::serving(quiz);
    let service = service(&backend);

    let StartOutcome::Started(session) =
        service.start(&QuizId::new("quiz-1"), true).await.unwrap()
    else {
        panic!("expected a retake session");
    };

    let quiz = session.quiz();
    assert!(!quiz.is_completed);
    assert_eq!(quiz.score, None);
    assert_eq!(quiz.completion_time, None);
    // Restored correctness survives so reveal can color options.
    assert_eq!(quiz.questions[0].options[0].is_correct, Some(true));
}

#[tokio::test]
async fn retake_submission_carries_the_flag() {
    let mut quiz = two_question_quiz();
    quiz["isCompleted"] = json!(true);
    let backend = FakeBackend::serving(quiz);
    backend.push_submit(Ok(scored_response(100.0)));
    let service = service(&backend);

    let StartOutcome::Started(mut session) =
        service.start(&QuizId::new("quiz-1"), true).await.unwrap()
    else {
        panic!("expected a retake session");
    };
    session.select_option(0).unwrap();
    session.advance();
    session.select_option(0).unwrap();

    service.finish(&mut session, true).await.unwrap();

    let submissions = backend.recorded_submissions();
    assert!(submissions[0].1, "retake flag should reach the backend");
}

#[tokio::test]
async fn malformed_payload_is_a_fatal_load_error() {
    let backend = FakeBackend::serving(json!({
        "_id": "quiz-1",
        "title": "Broken",
        "questions": null
    }));
    let service = service(&backend);

    let err = service
        .start(&QuizId::new("quiz-1"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, TakeQuizError::InvalidQuiz(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn finish_requires_every_answer() {
    let backend = FakeBackend::serving(two_question_quiz());
    let service = service(&backend);

    let StartOutcome::Started(mut session) =
        service.start(&QuizId::new("quiz-1"), false).await.unwrap()
    else {
        panic!("expected a started session");
    };
    session.select_option(0).unwrap();

    let err = service.finish(&mut session, false).await.unwrap_err();
    assert!(matches!(err, TakeQuizError::NotAllAnswered));
    assert!(backend.recorded_submissions().is_empty());
}

#[tokio::test]
async fn losing_the_submit_race_is_not_an_error() {
    let backend = FakeBackend::serving(two_question_quiz());
    backend.push_submit(Err(ApiError::AlreadyCompleted {
        message: "Quiz already completed".into(),
    }));
    let service = service(&backend);

    let StartOutcome::Started(mut session) =
        service.start(&QuizId::new("quiz-1"), false).await.unwrap()
    else {
        panic!("expected a started session");
    };
    session.select_option(0).unwrap();
    session.advance();
    session.select_option(0).unwrap();

    let outcome = service.finish(&mut session, false).await.unwrap();
    assert!(matches!(outcome, FinishOutcome::AlreadyCompleted));
    assert!(session.is_complete());
}

#[tokio::test]
async fn failed_submit_leaves_the_session_answerable() {
    let backend = FakeBackend::serving(two_question_quiz());
    backend.push_submit(Err(ApiError::Backend {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: "server fell over".into(),
    }));
    backend.push_submit(Ok(scored_response(100.0)));
    let service = service(&backend);

    let StartOutcome::Started(mut session) =
        service.start(&QuizId::new("quiz-1"), false).await.unwrap()
    else {
        panic!("expected a started session");
    };
    session.select_option(0).unwrap();
    session.advance();
    session.select_option(0).unwrap();

    let err = service.finish(&mut session, false).await.unwrap_err();
    assert!(matches!(err, TakeQuizError::Api(_)));
    assert!(!err.is_fatal());
    assert!(!session.is_complete());
    assert!(session.can_finish());

    // A retry goes through.
    let outcome = service.finish(&mut session, false).await.unwrap();
    assert!(matches!(outcome, FinishOutcome::Completed(_)));
}
