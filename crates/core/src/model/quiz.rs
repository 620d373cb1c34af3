use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{OptionId, QuestionId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizValidationError {
    #[error("quiz payload has no id")]
    MissingId,

    #[error("quiz payload has no question list")]
    MissingQuestions,

    #[error("quiz payload has an empty question list")]
    NoQuestions,

    #[error("question {index} has no option list")]
    MissingOptions { index: usize },

    #[error("question {index} has an empty option list")]
    NoOptions { index: usize },
}

/// One answer option.
///
/// `is_correct` is `None` until the backend is willing to disclose it: the
/// server strips the flag for quizzes the requesting user has not completed,
/// and this side never guesses a value for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    #[serde(rename = "_id")]
    pub id: OptionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
}

/// One question with its ordered options. Immutable for the duration of a
/// take session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuizOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A validated quiz as this client works with it.
///
/// The backend owns the persisted quiz; this is the transient copy a session
/// mutates. Build one from a [`QuizPayload`] via [`QuizPayload::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: QuizId,
    pub title: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_answers: Option<HashMap<QuestionId, OptionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u32>,
    #[serde(default)]
    pub attempts: u32,
}

impl Quiz {
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Clear completion state ahead of a retake.
    ///
    /// Applied to the fetched copy regardless of what the server returned for
    /// these fields; a retake always starts from a clean slate locally.
    pub fn reset_for_retake(&mut self) {
        self.is_completed = false;
        self.score = None;
        self.user_answers = None;
        self.completion_time = None;
    }

    /// Force every option's correctness back to "not yet determined".
    ///
    /// The backend already strips the flag for incomplete quizzes; this makes
    /// the client indifferent to a payload that leaked it anyway.
    pub fn hide_correctness(&mut self) {
        for question in &mut self.questions {
            for option in &mut question.options {
                option.is_correct = None;
            }
        }
    }
}

/// Raw wire shape of an option before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPayload {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub is_correct: Option<bool>,
}

/// Raw wire shape of a question before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<OptionPayload>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Raw wire shape of a quiz before validation.
///
/// Everything the backend might omit or null out is optional here; the
/// permissiveness ends at [`validate`](Self::validate), which either produces
/// a well-formed [`Quiz`] or a [`QuizValidationError`] the caller treats as a
/// load failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionPayload>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub user_answers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub completion_time: Option<u32>,
    #[serde(default)]
    pub attempts: u32,
}

impl QuizPayload {
    /// Validate the payload into a [`Quiz`].
    ///
    /// # Errors
    ///
    /// Returns `QuizValidationError` when the id is missing, the question list
    /// is missing or empty, or any question lacks a non-empty option list.
    /// Missing option ids are tolerated and become empty ids (the submission
    /// mapping falls back to an empty string for them).
    pub fn validate(self) -> Result<Quiz, QuizValidationError> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or(QuizValidationError::MissingId)?;
        let questions = self
            .questions
            .ok_or(QuizValidationError::MissingQuestions)?;
        if questions.is_empty() {
            return Err(QuizValidationError::NoQuestions);
        }

        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(index, question)| {
                let options = question
                    .options
                    .ok_or(QuizValidationError::MissingOptions { index })?;
                if options.is_empty() {
                    return Err(QuizValidationError::NoOptions { index });
                }

                let options = options
                    .into_iter()
                    .map(|option| QuizOption {
                        id: OptionId::new(option.id.unwrap_or_default()),
                        text: option.text.unwrap_or_else(|| "Invalid option".into()),
                        is_correct: option.is_correct,
                    })
                    .collect();

                Ok(QuizQuestion {
                    id: QuestionId::new(question.id.unwrap_or_default()),
                    text: question.text.unwrap_or_else(|| "Invalid question".into()),
                    options,
                    explanation: question.explanation.filter(|text| !text.is_empty()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Quiz {
            id: QuizId::new(id),
            title: self.title.unwrap_or_else(|| "Untitled Quiz".into()),
            subject: self.subject.unwrap_or_else(|| "General".into()),
            description: self.description,
            questions,
            is_completed: self.is_completed,
            score: self.score,
            user_answers: self.user_answers.map(|answers| {
                answers
                    .into_iter()
                    .map(|(question, option)| (QuestionId::new(question), OptionId::new(option)))
                    .collect()
            }),
            time_limit: self.time_limit,
            completion_time: self.completion_time,
            attempts: self.attempts,
        })
    }
}
