//! Orchestrates one quiz attempt against the backend.
//!
//! `TakeQuizService` owns the fetch-validate-start and finish-submit halves of
//! the flow; the in-between (selecting, navigating) lives on `TakeSession`
//! itself.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use quiz_core::model::{Quiz, QuizId, TakeSession};
use quiz_core::Clock;

use crate::backend::{QuizBackend, SubmitRequest};
use crate::error::{ApiError, TakeQuizError};

/// Result of starting an attempt.
#[derive(Debug)]
pub enum StartOutcome {
    /// The quiz is open for answering.
    Started(TakeSession),
    /// The quiz was already completed and this is not a retake; the caller
    /// shows results instead of questions.
    AlreadyCompleted(Quiz),
}

/// What a successful submission came back with.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    /// The scored quiz, with correctness flags now disclosed.
    pub quiz: Quiz,
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    /// Seconds the attempt took. Server-reported when available, otherwise the
    /// locally measured duration that was submitted.
    pub time_taken: u32,
    pub feedback: Option<String>,
}

/// Result of finishing an attempt.
#[derive(Debug)]
pub enum FinishOutcome {
    Completed(SubmissionResult),
    /// A concurrent submission won the race. The session is marked complete
    /// and the caller navigates to results.
    AlreadyCompleted,
}

/// Workflow service for taking a quiz.
#[derive(Clone)]
pub struct TakeQuizService {
    clock: Clock,
    backend: Arc<dyn QuizBackend>,
}

impl TakeQuizService {
    #[must_use]
    pub fn new(backend: Arc<dyn QuizBackend>) -> Self {
        Self {
            clock: Clock::default_clock(),
            backend,
        }
    }

    #[must_use]
    pub fn with_clock(backend: Arc<dyn QuizBackend>, clock: Clock) -> Self {
        Self { clock, backend }
    }

    /// Fetch a quiz and open a session over it.
    ///
    /// For a fresh take of a completed quiz the session never starts; the
    /// fetched quiz is returned so the caller can redirect to results. With
    /// `retake` the completion fields are wiped locally no matter what the
    /// server sent, and restored correctness flags are kept for display after
    /// reveal. A fresh take blanks the flags instead, so a payload that leaked
    /// them cannot color options early.
    ///
    /// # Errors
    ///
    /// `TakeQuizError::Api` for fetch failures, `InvalidQuiz` when the payload
    /// cannot back a session, `Session` when the validated quiz still has an
    /// empty question or option list.
    pub async fn start(&self, id: &QuizId, retake: bool) -> Result<StartOutcome, TakeQuizError> {
        let payload = self.backend.fetch_quiz(id).await?;
        let mut quiz = payload.validate()?;

        if quiz.is_completed && !retake {
            info!(quiz_id = %id, "quiz already completed, skipping session");
            return Ok(StartOutcome::AlreadyCompleted(quiz));
        }

        if retake {
            quiz.reset_for_retake();
        } else {
            quiz.hide_correctness();
        }

        let session = TakeSession::new(quiz, self.clock.now())?;
        info!(quiz_id = %id, questions = session.total_questions(), retake, "session started");
        Ok(StartOutcome::Started(session))
    }

    /// Submit the session's answers for scoring.
    ///
    /// On success the session takes the server's scored quiz as its state and
    /// the submission numbers come back for the results screen. When the
    /// backend reports the quiz was already completed, the session is marked
    /// complete and `FinishOutcome::AlreadyCompleted` is returned; that race
    /// is not an error. Any other failure leaves the session untouched and
    /// still submittable.
    ///
    /// # Errors
    ///
    /// `TakeQuizError::NotAllAnswered` if any question lacks a selection or
    /// the session is already complete, `InvalidQuiz` when the scored payload
    /// is malformed, `Api` for transport and backend failures.
    pub async fn finish(
        &self,
        session: &mut TakeSession,
        retake: bool,
    ) -> Result<FinishOutcome, TakeQuizError> {
        if !session.can_finish() {
            return Err(TakeQuizError::NotAllAnswered);
        }

        let now = self.clock.now();
        let completion_time = session.elapsed_secs(now);
        let request = SubmitRequest {
            answers: session.answer_payload(),
            completion_time,
        };
        let quiz_id = session.quiz().id.clone();

        match self.backend.submit_answers(&quiz_id, request, retake).await {
            Ok(response) => {
                let quiz = response.quiz.validate()?;
                session.complete_with(quiz.clone(), now);
                info!(quiz_id = %quiz_id, score = response.score, "submission accepted");
                Ok(FinishOutcome::Completed(SubmissionResult {
                    quiz,
                    score: response.score,
                    correct_answers: response.correct_answers,
                    total_questions: response.total_questions,
                    time_taken: response.time_taken.unwrap_or(completion_time),
                    feedback: response.feedback,
                }))
            }
            Err(ApiError::AlreadyCompleted { message }) => {
                warn!(quiz_id = %quiz_id, %message, "submission raced an earlier completion");
                session.mark_completed(now);
                Ok(FinishOutcome::AlreadyCompleted)
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl fmt::Debug for TakeQuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakeQuizService")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
