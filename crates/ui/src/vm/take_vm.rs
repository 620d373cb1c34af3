use quiz_core::model::{QuizOption, TakeSession};
use services::{FinishOutcome, TakeQuizError, TakeQuizService};

use crate::views::{ViewError, view_error_from_take};

/// User actions on the take screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeIntent {
    Select(usize),
    Next,
    Previous,
    Finish,
}

/// Where the screen goes after a submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TakeOutcome {
    Continue,
    /// Submission landed (or raced an earlier one); show results.
    Completed { quiz_id: String },
}

/// Presentation wrapper around a running [`TakeSession`].
pub struct TakeQuizVm {
    session: TakeSession,
}

impl TakeQuizVm {
    #[must_use]
    pub fn new(session: TakeSession) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn quiz_id(&self) -> String {
        self.session.quiz().id.as_str().to_owned()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.session.quiz().title
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.session.current_question().text
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.session.current_question().options
    }

    /// Explanation for the current question, shown only after reveal.
    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        if !self.session.current_revealed() {
            return None;
        }
        self.session.current_question().explanation.as_deref()
    }

    #[must_use]
    pub fn progress_label(&self) -> String {
        format!(
            "Question {} of {}",
            self.session.current_index() + 1,
            self.session.total_questions()
        )
    }

    #[must_use]
    pub fn answered_label(&self) -> String {
        let progress = self.session.progress();
        format!("{} of {} answered", progress.answered, progress.total)
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.session.current_revealed()
    }

    #[must_use]
    pub fn can_next(&self) -> bool {
        self.session.can_advance()
    }

    #[must_use]
    pub fn can_previous(&self) -> bool {
        self.session.can_retreat()
    }

    #[must_use]
    pub fn can_finish(&self) -> bool {
        self.session.can_finish()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.session.current_index() + 1 == self.session.total_questions()
    }

    /// Session start in epoch milliseconds, for the display timer script.
    #[must_use]
    pub fn started_at_millis(&self) -> i64 {
        self.session.started_at().timestamp_millis()
    }

    /// CSS class for one option of the current question.
    ///
    /// Before reveal every option is plain. After reveal a known-correct
    /// option goes green, a picked wrong option red, and a picked option with
    /// undisclosed correctness is only marked selected.
    #[must_use]
    pub fn option_class(&self, option_index: usize) -> &'static str {
        let revealed = self.session.current_revealed();
        if !revealed {
            return "option";
        }
        let selected = self.session.selection(self.session.current_index()) == Some(option_index);
        match self.options().get(option_index).and_then(|o| o.is_correct) {
            Some(true) => "option correct",
            Some(false) if selected => "option incorrect",
            _ if selected => "option selected",
            _ => "option",
        }
    }

    pub fn select(&mut self, option_index: usize) {
        // Clicks on a locked or out-of-range option are ignored; the buttons
        // are disabled after reveal anyway.
        let _ = self.session.select_option(option_index);
    }

    pub fn next(&mut self) {
        self.session.advance();
    }

    pub fn previous(&mut self) {
        self.session.retreat();
    }

    /// Submit the answers via the workflow service.
    ///
    /// # Errors
    ///
    /// Returns a `ViewError` describing the failure; the session stays
    /// submittable for non-fatal errors.
    pub async fn finish(
        &mut self,
        service: &TakeQuizService,
        retake: bool,
    ) -> Result<TakeOutcome, ViewError> {
        match service.finish(&mut self.session, retake).await {
            Ok(FinishOutcome::Completed(_) | FinishOutcome::AlreadyCompleted) => {
                Ok(TakeOutcome::Completed {
                    quiz_id: self.quiz_id(),
                })
            }
            // The Finish button is only offered once every question has an
            // answer; if the guard slips, stay on the screen.
            Err(TakeQuizError::NotAllAnswered) => Ok(TakeOutcome::Continue),
            Err(err) => Err(view_error_from_take(&err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{OptionId, QuestionId, Quiz, QuizId, QuizQuestion};
    use quiz_core::time::fixed_now;

    fn build_quiz(correctness: [Option<bool>; 3]) -> Quiz {
        Quiz {
            id: QuizId::new("quiz-1"),
            title: "Test".into(),
            subject: "General".into(),
            description: None,
            questions: vec![QuizQuestion {
                id: QuestionId::new("q1"),
                text: "Pick one".into(),
                options: correctness
                    .iter()
                    .enumerate()
                    .map(|(index, is_correct)| QuizOption {
                        id: OptionId::new(format!("o{index}")),
                        text: format!("Option {index}"),
                        is_correct: *is_correct,
                    })
                    .collect(),
                explanation: Some("Because.".into()),
            }],
            is_completed: false,
            score: None,
            user_answers: None,
            time_limit: None,
            completion_time: None,
            attempts: 0,
        }
    }

    fn build_vm(correctness: [Option<bool>; 3]) -> TakeQuizVm {
        let session = TakeSession::new(build_quiz(correctness), fixed_now()).unwrap();
        TakeQuizVm::new(session)
    }

    #[test]
    fn options_are_plain_before_reveal() {
        let vm = build_vm([Some(true), Some(false), Some(false)]);
        assert_eq!(vm.option_class(0), "option");
        assert_eq!(vm.option_class(1), "option");
        assert!(vm.explanation().is_none());
    }

    #[test]
    fn reveal_colors_known_correctness() {
        let mut vm = build_vm([Some(false), Some(true), Some(false)]);
        vm.select(0);

        assert_eq!(vm.option_class(0), "option incorrect");
        assert_eq!(vm.option_class(1), "option correct");
        assert_eq!(vm.option_class(2), "option");
        assert_eq!(vm.explanation(), Some("Because."));
    }

    #[test]
    fn reveal_without_correctness_only_marks_the_pick() {
        let mut vm = build_vm([None, None, None]);
        vm.select(2);

        assert_eq!(vm.option_class(0), "option");
        assert_eq!(vm.option_class(2), "option selected");
    }

    #[test]
    fn second_click_is_ignored() {
        let mut vm = build_vm([Some(true), Some(false), Some(false)]);
        vm.select(1);
        vm.select(0);
        assert_eq!(vm.option_class(1), "option incorrect");
        assert_eq!(vm.option_class(0), "option correct");
    }
}
