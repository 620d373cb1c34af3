use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use quiz_core::model::{LeaderboardEntry, QuizId, QuizPayload, UserProfile, UserStats};

use crate::backend::{QuizBackend, SubmitRequest, SubmitResponse};
use crate::error::ApiError;

/// Callback invoked when the backend answers 401 anywhere.
///
/// The original client redirected to the login page from inside its HTTP
/// interceptor; here the decision belongs to whoever constructs the client.
pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;

/// Shared slot for the bearer token, attached to every request when present.
#[derive(Clone, Default)]
pub struct TokenSlot(Arc<RwLock<Option<String>>>);

impl TokenSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut slot) = self.0.write() {
            *slot = Some(token.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.0.write() {
            *slot = None;
        }
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.0.read().ok().and_then(|slot| slot.clone())
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

/// Settings for AI quiz generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSpec {
    pub subject: String,
    pub num_questions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// Replacement content for an existing quiz, sent by the editor.
///
/// Carries the full question list; the backend swaps it wholesale. Ids are
/// kept where the row already existed so the server can preserve them, and
/// omitted for rows the editor created.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizUpdate {
    pub title: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionUpdate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub options: Vec<OptionUpdate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionUpdate {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub is_correct: bool,
}

/// A successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSuccess {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Standard `{ success, message?, data }` wrapper most endpoints use.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Backend {
                status: StatusCode::OK,
                message: self
                    .message
                    .unwrap_or_else(|| "request was not successful".into()),
            });
        }
        self.data.ok_or(ApiError::Backend {
            status: StatusCode::OK,
            message: "response carried no data".into(),
        })
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// HTTP client for the quiz backend.
///
/// Holds the base URL, a shared token slot and an optional unauthorized
/// handler. Cheap to clone; the underlying `reqwest::Client` pools
/// connections.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: TokenSlot,
    on_unauthorized: Option<UnauthorizedHandler>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            token: TokenSlot::new(),
            on_unauthorized: None,
        }
    }

    #[must_use]
    pub fn with_unauthorized_handler(mut self, handler: UnauthorizedHandler) -> Self {
        self.on_unauthorized = Some(handler);
        self
    }

    /// The shared token slot, for the auth service to fill and clear.
    #[must_use]
    pub fn token_slot(&self) -> TokenSlot {
        self.token.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ApiError::Network)?;
        self.check(response).await
    }

    /// Map non-success statuses to the error taxonomy.
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        warn!(%status, %message, "backend request failed");

        match status {
            StatusCode::UNAUTHORIZED => {
                if let Some(handler) = &self.on_unauthorized {
                    handler();
                }
                Err(ApiError::Unauthorized)
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::BAD_REQUEST if message.contains("already completed") => {
                Err(ApiError::AlreadyCompleted { message })
            }
            _ => Err(ApiError::Backend { status, message }),
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, ApiError> {
        debug!(%email, "logging in");
        let response = self
            .send(
                self.http
                    .post(self.url("/auth/login"))
                    .json(&LoginRequest { email, password }),
            )
            .await?;
        Self::decode::<Envelope<AuthSuccess>>(response)
            .await?
            .into_data()
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSuccess, ApiError> {
        debug!(%email, "registering");
        let response = self
            .send(self.http.post(self.url("/auth/register")).json(
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            ))
            .await?;
        Self::decode::<Envelope<AuthSuccess>>(response)
            .await?
            .into_data()
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token is missing or expired.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let response = self.send(self.http.get(self.url("/auth/me"))).await?;
        Self::decode::<Envelope<UserProfile>>(response)
            .await?
            .into_data()
    }

    /// Fetch aggregate stats for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn user_stats(&self) -> Result<UserStats, ApiError> {
        let response = self.send(self.http.get(self.url("/auth/stats"))).await?;
        Self::decode::<Envelope<UserStats>>(response)
            .await?
            .into_data()
    }

    /// Ask the backend to generate a quiz for the given settings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn generate_quiz(&self, spec: &QuizSpec) -> Result<QuizPayload, ApiError> {
        debug!(subject = %spec.subject, questions = spec.num_questions, "generating quiz");
        let response = self
            .send(self.http.post(self.url("/quiz/generate")).json(spec))
            .await?;
        Self::decode::<Envelope<QuizPayload>>(response)
            .await?
            .into_data()
    }

    /// List the signed-in user's quizzes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn user_quizzes(&self) -> Result<Vec<QuizPayload>, ApiError> {
        let response = self
            .send(self.http.get(self.url("/quiz/user/quizzes")))
            .await?;
        Self::decode::<Envelope<Vec<QuizPayload>>>(response)
            .await?
            .into_data()
    }

    /// Rewrite an existing quiz's content.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown quiz and `ApiError` for
    /// transport failures or a backend rejection.
    pub async fn update_quiz(
        &self,
        id: &QuizId,
        update: &QuizUpdate,
    ) -> Result<QuizPayload, ApiError> {
        debug!(quiz_id = %id, questions = update.questions.len(), "updating quiz");
        let response = self
            .send(self.http.put(self.url(&format!("/quiz/{id}"))).json(update))
            .await?;
        Self::decode::<Envelope<QuizPayload>>(response)
            .await?
            .into_data()
    }

    /// Fetch the leaderboard, already ranked server-side.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` for transport failures or a backend rejection.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let response = self
            .send(self.http.get(self.url("/user/leaderboard")))
            .await?;
        Self::decode::<Envelope<Vec<LeaderboardEntry>>>(response)
            .await?
            .into_data()
    }
}

#[async_trait]
impl QuizBackend for ApiClient {
    async fn fetch_quiz(&self, id: &QuizId) -> Result<QuizPayload, ApiError> {
        debug!(quiz_id = %id, "fetching quiz");
        let response = self
            .send(self.http.get(self.url(&format!("/quiz/{id}"))))
            .await?;
        // This endpoint returns the quiz bare, without the envelope.
        Self::decode(response).await
    }

    async fn submit_answers(
        &self,
        id: &QuizId,
        request: SubmitRequest,
        retake: bool,
    ) -> Result<SubmitResponse, ApiError> {
        debug!(quiz_id = %id, retake, answers = request.answers.len(), "submitting answers");
        let mut url = self.url(&format!("/quiz/{id}/submit"));
        if retake {
            url.push_str("?retake=true");
        }
        let response = self.send(self.http.post(url).json(&request)).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_slot_round_trip() {
        let slot = TokenSlot::new();
        assert!(!slot.is_set());
        slot.set("abc");
        assert_eq!(slot.get().as_deref(), Some("abc"));
        slot.clear();
        assert!(!slot.is_set());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.url("/quiz/x"), "http://localhost:5000/api/quiz/x");
    }

    #[test]
    fn envelope_without_data_is_an_error() {
        let envelope: Envelope<UserStats> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(envelope.into_data().is_err());
    }

    #[test]
    fn envelope_failure_carries_message() {
        let envelope: Envelope<UserStats> =
            serde_json::from_str(r#"{"success":false,"message":"nope"}"#).unwrap();
        match envelope.into_data().unwrap_err() {
            ApiError::Backend { message, .. } => assert_eq!(message, "nope"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn quiz_update_keeps_ids_and_renames_fields() {
        let update = QuizUpdate {
            title: "Basics".into(),
            subject: "Rust".into(),
            description: None,
            questions: vec![QuestionUpdate {
                id: Some("q1".into()),
                text: "?".into(),
                options: vec![
                    OptionUpdate {
                        id: Some("o1".into()),
                        text: "a".into(),
                        is_correct: true,
                    },
                    OptionUpdate {
                        id: None,
                        text: "b".into(),
                        is_correct: false,
                    },
                ],
                explanation: None,
            }],
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Basics","subject":"Rust","questions":[{"_id":"q1","text":"?","options":[{"_id":"o1","text":"a","isCorrect":true},{"text":"b","isCorrect":false}]}]}"#
        );
    }

    #[test]
    fn submit_request_serializes_camel_case() {
        let request = SubmitRequest {
            answers: vec!["o1".into(), String::new()],
            completion_time: 42,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"answers":["o1",""],"completionTime":42}"#);
    }
}
