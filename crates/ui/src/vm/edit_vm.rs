use quiz_core::model::QuizPayload;
use services::{OptionUpdate, QuestionUpdate, QuizUpdate};

/// One editable answer option.
#[derive(Clone, Debug, PartialEq)]
pub struct EditOptionRow {
    id: Option<String>,
    pub text: String,
    pub is_correct: bool,
}

/// One editable question with its options.
#[derive(Clone, Debug, PartialEq)]
pub struct EditQuestionRow {
    id: Option<String>,
    pub text: String,
    pub explanation: String,
    pub options: Vec<EditOptionRow>,
}

/// Presentation model for the quiz editor.
///
/// Works on the permissive payload shape rather than a validated quiz so the
/// owner can repair a quiz the take screen would reject. The backend rechecks
/// everything on save; the checks here exist to give field-level messages.
pub struct EditQuizVm {
    quiz_id: String,
    pub title: String,
    pub subject: String,
    pub description: String,
    questions: Vec<EditQuestionRow>,
}

impl EditQuizVm {
    /// Build the editable form from a fetched payload.
    ///
    /// Returns `None` when the payload has no usable id; everything else is
    /// editable, including a quiz with no questions yet.
    #[must_use]
    pub fn from_payload(payload: QuizPayload) -> Option<Self> {
        let quiz_id = payload.id.filter(|id| !id.is_empty())?;
        let questions = payload
            .questions
            .unwrap_or_default()
            .into_iter()
            .map(|question| EditQuestionRow {
                id: question.id.filter(|id| !id.is_empty()),
                text: question.text.unwrap_or_default(),
                explanation: question.explanation.unwrap_or_default(),
                options: question
                    .options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|option| EditOptionRow {
                        id: option.id.filter(|id| !id.is_empty()),
                        text: option.text.unwrap_or_default(),
                        is_correct: option.is_correct.unwrap_or(false),
                    })
                    .collect(),
            })
            .collect();

        Some(Self {
            quiz_id,
            title: payload.title.unwrap_or_default(),
            subject: payload.subject.unwrap_or_default(),
            description: payload.description.unwrap_or_default(),
            questions,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    #[must_use]
    pub fn questions(&self) -> &[EditQuestionRow] {
        &self.questions
    }

    pub fn set_question_text(&mut self, question: usize, text: String) {
        if let Some(row) = self.questions.get_mut(question) {
            row.text = text;
        }
    }

    pub fn set_explanation(&mut self, question: usize, text: String) {
        if let Some(row) = self.questions.get_mut(question) {
            row.explanation = text;
        }
    }

    pub fn set_option_text(&mut self, question: usize, option: usize, text: String) {
        if let Some(row) = self
            .questions
            .get_mut(question)
            .and_then(|row| row.options.get_mut(option))
        {
            row.text = text;
        }
    }

    /// Mark one option as the correct answer, clearing its siblings.
    pub fn mark_correct(&mut self, question: usize, option: usize) {
        let Some(row) = self.questions.get_mut(question) else {
            return;
        };
        if option >= row.options.len() {
            return;
        }
        for (index, candidate) in row.options.iter_mut().enumerate() {
            candidate.is_correct = index == option;
        }
    }

    /// First reason the form cannot be saved, if any.
    #[must_use]
    pub fn first_problem(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Quiz title is required".into());
        }
        if self.subject.trim().is_empty() {
            return Some("Subject is required".into());
        }
        if self.questions.is_empty() {
            return Some("At least one question is required".into());
        }
        for (qi, question) in self.questions.iter().enumerate() {
            let number = qi + 1;
            if question.text.trim().is_empty() {
                return Some(format!("Question {number} text is required"));
            }
            if question.options.is_empty() {
                return Some(format!("Question {number} must have at least one option"));
            }
            for (oi, option) in question.options.iter().enumerate() {
                if option.text.trim().is_empty() {
                    return Some(format!(
                        "Option {} in Question {number} text is required",
                        oi + 1
                    ));
                }
            }
            if !question.options.iter().any(|option| option.is_correct) {
                return Some(format!("Question {number} must have a correct option"));
            }
        }
        None
    }

    /// The request body for saving, trimmed and with ids preserved.
    #[must_use]
    pub fn to_update(&self) -> QuizUpdate {
        QuizUpdate {
            title: self.title.trim().to_owned(),
            subject: self.subject.trim().to_owned(),
            description: Some(self.description.trim().to_owned())
                .filter(|text| !text.is_empty()),
            questions: self
                .questions
                .iter()
                .map(|question| QuestionUpdate {
                    id: question.id.clone(),
                    text: question.text.trim().to_owned(),
                    options: question
                        .options
                        .iter()
                        .map(|option| OptionUpdate {
                            id: option.id.clone(),
                            text: option.text.trim().to_owned(),
                            is_correct: option.is_correct,
                        })
                        .collect(),
                    explanation: Some(question.explanation.trim().to_owned())
                        .filter(|text| !text.is_empty()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> QuizPayload {
        serde_json::from_str(
            r#"{
                "_id": "quiz-1",
                "title": "Basics",
                "subject": "Rust",
                "questions": [{
                    "_id": "q1",
                    "text": "Pick one",
                    "options": [
                        {"_id": "o1", "text": "a", "isCorrect": true},
                        {"_id": "o2", "text": "b", "isCorrect": false}
                    ]
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn payload_without_id_is_not_editable() {
        assert!(EditQuizVm::from_payload(QuizPayload::default()).is_none());
    }

    #[test]
    fn marking_correct_clears_siblings() {
        let mut vm = EditQuizVm::from_payload(payload()).unwrap();
        vm.mark_correct(0, 1);

        let options = &vm.questions()[0].options;
        assert!(!options[0].is_correct);
        assert!(options[1].is_correct);

        vm.mark_correct(0, 0);
        let options = &vm.questions()[0].options;
        assert!(options[0].is_correct);
        assert!(!options[1].is_correct);
    }

    #[test]
    fn problems_are_reported_in_form_order() {
        let mut vm = EditQuizVm::from_payload(payload()).unwrap();
        assert_eq!(vm.first_problem(), None);

        vm.set_option_text(0, 1, "  ".into());
        assert_eq!(
            vm.first_problem().as_deref(),
            Some("Option 2 in Question 1 text is required")
        );

        vm.set_question_text(0, String::new());
        assert_eq!(
            vm.first_problem().as_deref(),
            Some("Question 1 text is required")
        );

        vm.title = String::new();
        assert_eq!(vm.first_problem().as_deref(), Some("Quiz title is required"));
    }

    #[test]
    fn question_needs_a_correct_option() {
        let mut vm = EditQuizVm::from_payload(payload()).unwrap();
        for option in &mut vm.questions[0].options {
            option.is_correct = false;
        }
        assert_eq!(
            vm.first_problem().as_deref(),
            Some("Question 1 must have a correct option")
        );
    }

    #[test]
    fn update_preserves_ids_and_trims_text() {
        let mut vm = EditQuizVm::from_payload(payload()).unwrap();
        vm.set_question_text(0, "  Pick the best one  ".into());
        vm.set_explanation(0, "   ".into());
        let update = vm.to_update();

        assert_eq!(update.questions[0].id.as_deref(), Some("q1"));
        assert_eq!(update.questions[0].text, "Pick the best one");
        assert_eq!(update.questions[0].explanation, None);
        assert_eq!(update.questions[0].options[0].id.as_deref(), Some("o1"));
        assert!(update.questions[0].options[0].is_correct);
    }
}
