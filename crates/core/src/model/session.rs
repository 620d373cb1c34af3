use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Quiz, QuizQuestion};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TakeSessionError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("question {index} has no options")]
    EmptyOptions { index: usize },

    #[error("session already completed")]
    Completed,

    #[error("question {index} is already revealed")]
    AlreadyRevealed { index: usize },

    #[error("option {option} is out of range for question {index}")]
    OptionOutOfRange { index: usize, option: usize },
}

/// Snapshot of how far a session has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakeProgress {
    pub total: usize,
    pub answered: usize,
    pub is_complete: bool,
}

/// In-memory state machine for taking one quiz.
///
/// Holds the working copy of the quiz, the cursor over its questions, one
/// selection slot per question (`None` until the learner picks an option) and
/// one reveal flag per question. Reveal is one-way: picking an option locks
/// that question's choice and shows correctness, and no later action clears it
/// within this session. Discarded on navigation away; superseded by the
/// server's scored quiz on successful submission.
pub struct TakeSession {
    quiz: Quiz,
    current: usize,
    selections: Vec<Option<usize>>,
    revealed: Vec<bool>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TakeSession {
    /// Create a session over a freshly fetched quiz.
    ///
    /// `started_at` should come from the services layer clock; the elapsed
    /// time sent at submission is measured from it.
    ///
    /// # Errors
    ///
    /// Returns `TakeSessionError::NoQuestions` for an empty quiz and
    /// `TakeSessionError::EmptyOptions` if any question has no options.
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Result<Self, TakeSessionError> {
        if quiz.questions.is_empty() {
            return Err(TakeSessionError::NoQuestions);
        }
        for (index, question) in quiz.questions.iter().enumerate() {
            if question.options.is_empty() {
                return Err(TakeSessionError::EmptyOptions { index });
            }
        }

        let count = quiz.questions.len();
        Ok(Self {
            quiz,
            current: 0,
            selections: vec![None; count],
            revealed: vec![false; count],
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &QuizQuestion {
        &self.quiz.questions[self.current]
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.questions.len()
    }

    /// Number of questions with a recorded selection.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn progress(&self) -> TakeProgress {
        TakeProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            is_complete: self.is_complete(),
        }
    }

    /// Selected option index for a question, if any.
    #[must_use]
    pub fn selection(&self, question_index: usize) -> Option<usize> {
        self.selections.get(question_index).copied().flatten()
    }

    /// Whether a question's correctness has been revealed.
    #[must_use]
    pub fn is_revealed(&self, question_index: usize) -> bool {
        self.revealed.get(question_index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn current_revealed(&self) -> bool {
        self.revealed[self.current]
    }

    /// Record an option pick for the current question and reveal it.
    ///
    /// Selection only applies to the current question. Once a question is
    /// revealed its choice is locked for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns `Completed` after submission, `AlreadyRevealed` for a locked
    /// question, `OptionOutOfRange` for a bad option index.
    pub fn select_option(&mut self, option_index: usize) -> Result<(), TakeSessionError> {
        if self.is_complete() {
            return Err(TakeSessionError::Completed);
        }
        if self.revealed[self.current] {
            return Err(TakeSessionError::AlreadyRevealed {
                index: self.current,
            });
        }
        if option_index >= self.current_question().options.len() {
            return Err(TakeSessionError::OptionOutOfRange {
                index: self.current,
                option: option_index,
            });
        }

        self.selections[self.current] = Some(option_index);
        self.revealed[self.current] = true;
        Ok(())
    }

    /// True when the Next action is available.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.revealed[self.current] && self.current + 1 < self.total_questions()
    }

    /// Move to the next question. A bounded no-op when unavailable.
    pub fn advance(&mut self) {
        if self.can_advance() {
            self.current += 1;
        }
    }

    /// True when the Previous action is available.
    #[must_use]
    pub fn can_retreat(&self) -> bool {
        self.current > 0
    }

    /// Move to the previous question. A no-op on the first question; never
    /// clears a prior answer or reveal.
    pub fn retreat(&mut self) {
        if self.can_retreat() {
            self.current -= 1;
        }
    }

    /// True when every question has a recorded selection.
    #[must_use]
    pub fn can_finish(&self) -> bool {
        !self.is_complete() && self.selections.iter().all(Option::is_some)
    }

    /// The wire payload for submission: one option id per question, in
    /// question order.
    ///
    /// A slot with no selection, or whose option carries no id, maps to an
    /// empty string instead of failing. `can_finish` should make the first
    /// case unreachable; the fallback stays anyway.
    #[must_use]
    pub fn answer_payload(&self) -> Vec<String> {
        self.quiz
            .questions
            .iter()
            .zip(&self.selections)
            .map(|(question, slot)| {
                slot.and_then(|index| question.options.get(index))
                    .map(|option| option.id.as_str().to_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Wall-clock seconds since the session started.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        let secs = (now - self.started_at).num_seconds();
        u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
    }

    /// Replace local state with the server's authoritative scored quiz.
    ///
    /// The server is the sole source of truth for correctness and scoring;
    /// nothing is computed locally.
    pub fn complete_with(&mut self, quiz: Quiz, completed_at: DateTime<Utc>) {
        self.quiz = quiz;
        self.quiz.is_completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Mark the session completed without new quiz data.
    ///
    /// Used when the backend reports the quiz was already completed by an
    /// earlier submission; the caller redirects to results instead of erroring.
    pub fn mark_completed(&mut self, completed_at: DateTime<Utc>) {
        self.quiz.is_completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Score from the authoritative quiz copy, when known.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.quiz.score
    }
}

impl fmt::Debug for TakeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakeSession")
            .field("quiz_id", &self.quiz.id)
            .field("questions", &self.quiz.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answered_count())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionId, QuestionId, QuizId, QuizOption};
    use crate::time::fixed_now;
    use chrono::Duration;

    fn build_question(id: u32, options: usize) -> QuizQuestion {
        QuizQuestion {
            id: QuestionId::new(format!("q{id}")),
            text: format!("Question {id}"),
            options: (0..options)
                .map(|opt| QuizOption {
                    id: OptionId::new(format!("q{id}-o{opt}")),
                    text: format!("Option {opt}"),
                    is_correct: None,
                })
                .collect(),
            explanation: None,
        }
    }

    fn build_quiz(questions: usize) -> Quiz {
        Quiz {
            id: QuizId::new("quiz-1"),
            title: "Test".into(),
            subject: "General".into(),
            description: None,
            questions: (0..questions)
                .map(|index| build_question(u32::try_from(index).unwrap(), 2))
                .collect(),
            is_completed: false,
            score: None,
            user_answers: None,
            time_limit: None,
            completion_time: None,
            attempts: 0,
        }
    }

    #[test]
    fn empty_quiz_is_rejected() {
        let err = TakeSession::new(build_quiz(0), fixed_now()).unwrap_err();
        assert_eq!(err, TakeSessionError::NoQuestions);
    }

    #[test]
    fn question_without_options_is_rejected() {
        let mut quiz = build_quiz(2);
        quiz.questions[1].options.clear();
        let err = TakeSession::new(quiz, fixed_now()).unwrap_err();
        assert_eq!(err, TakeSessionError::EmptyOptions { index: 1 });
    }

    #[test]
    fn selection_slots_match_question_count() {
        let session = TakeSession::new(build_quiz(3), fixed_now()).unwrap();
        assert_eq!(session.total_questions(), 3);
        assert_eq!(session.answered_count(), 0);
        assert!((0..3).all(|index| session.selection(index).is_none()));
    }

    #[test]
    fn select_reveals_and_locks() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();

        session.select_option(1).unwrap();
        assert_eq!(session.selection(0), Some(1));
        assert!(session.is_revealed(0));

        let err = session.select_option(0).unwrap_err();
        assert_eq!(err, TakeSessionError::AlreadyRevealed { index: 0 });
        assert_eq!(session.selection(0), Some(1));
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut session = TakeSession::new(build_quiz(1), fixed_now()).unwrap();
        let err = session.select_option(5).unwrap_err();
        assert_eq!(
            err,
            TakeSessionError::OptionOutOfRange { index: 0, option: 5 }
        );
        assert!(!session.is_revealed(0));
    }

    #[test]
    fn advance_requires_reveal() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        assert!(!session.can_advance());
        session.advance();
        assert_eq!(session.current_index(), 0);

        session.select_option(0).unwrap();
        assert!(session.can_advance());
        session.advance();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn retreat_at_zero_is_a_no_op() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        session.retreat();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn reveal_survives_navigation() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        session.select_option(0).unwrap();
        session.advance();
        session.retreat();
        assert!(session.is_revealed(0));
        assert_eq!(session.selection(0), Some(0));
    }

    #[test]
    fn can_finish_needs_every_slot() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        assert!(!session.can_finish());

        session.select_option(0).unwrap();
        assert!(!session.can_finish());

        session.advance();
        session.select_option(1).unwrap();
        assert!(session.can_finish());
    }

    #[test]
    fn answer_payload_maps_selections_to_option_ids() {
        let mut session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        session.select_option(1).unwrap();
        session.advance();
        session.select_option(0).unwrap();

        assert_eq!(session.answer_payload(), vec!["q0-o1", "q1-o0"]);
    }

    #[test]
    fn answer_payload_falls_back_to_empty_string() {
        let mut quiz = build_quiz(2);
        quiz.questions[1].options[0].id = OptionId::new("");
        let mut session = TakeSession::new(quiz, fixed_now()).unwrap();
        session.select_option(1).unwrap();
        session.advance();
        session.select_option(0).unwrap();

        // Second answer has no option id; first slot keeps its real id.
        assert_eq!(session.answer_payload(), vec!["q0-o1".to_string(), String::new()]);
    }

    #[test]
    fn unanswered_slot_submits_empty_string() {
        let session = TakeSession::new(build_quiz(2), fixed_now()).unwrap();
        assert_eq!(session.answer_payload(), vec![String::new(), String::new()]);
    }

    #[test]
    fn elapsed_counts_whole_seconds_from_start() {
        let session = TakeSession::new(build_quiz(1), fixed_now()).unwrap();
        let later = fixed_now() + Duration::seconds(95);
        assert_eq!(session.elapsed_secs(later), 95);
        // A clock that went backwards never produces a negative elapsed time.
        assert_eq!(session.elapsed_secs(fixed_now() - Duration::seconds(5)), 0);
    }

    #[test]
    fn complete_with_takes_the_server_state() {
        let mut session = TakeSession::new(build_quiz(1), fixed_now()).unwrap();
        session.select_option(0).unwrap();

        let mut scored = build_quiz(1);
        scored.score = Some(50.0);
        scored.attempts = 1;
        session.complete_with(scored, fixed_now());

        assert!(session.is_complete());
        assert!(session.quiz().is_completed);
        assert_eq!(session.score(), Some(50.0));

        let err = session.select_option(0).unwrap_err();
        assert_eq!(err, TakeSessionError::Completed);
    }
}
