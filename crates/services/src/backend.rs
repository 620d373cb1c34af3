use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quiz_core::model::{QuizId, QuizPayload};

use crate::error::ApiError;

/// Body of a submission request, exactly as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    /// One option id per question, in question order. Unanswered slots carry
    /// an empty string.
    pub answers: Vec<String>,
    /// Wall-clock seconds spent on the attempt, measured client-side.
    pub completion_time: u32,
}

/// The backend's reply to a submission: the scored quiz plus the numbers the
/// results screen renders.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub quiz: QuizPayload,
    pub score: f64,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub total_questions: u32,
    /// Server-reported duration; absent in older responses, in which case the
    /// locally computed completion time stands in.
    #[serde(default)]
    pub time_taken: Option<u32>,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// The remote collaborator the take-quiz flow depends on.
///
/// `ApiClient` implements this over HTTP; tests implement it in memory. The
/// flow never sees anything else of the transport.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    /// Fetch a quiz for taking. Options carry `isCorrect` only when the
    /// requesting user already completed the quiz.
    async fn fetch_quiz(&self, id: &QuizId) -> Result<QuizPayload, ApiError>;

    /// Submit answers for scoring. `retake` maps to the `?retake=true` query
    /// parameter.
    async fn submit_answers(
        &self,
        id: &QuizId,
        request: SubmitRequest,
        retake: bool,
    ) -> Result<SubmitResponse, ApiError>;
}
